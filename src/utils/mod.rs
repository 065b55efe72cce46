pub mod escape;
pub mod uri;
