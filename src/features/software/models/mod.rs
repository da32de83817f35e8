mod software;

pub use software::{NewSoftware, Software, SoftwareChanges};
