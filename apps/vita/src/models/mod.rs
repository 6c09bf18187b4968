pub mod cv;

pub use cv::{CoverLetter, Cv, Education, Experience, SkillCategory};
