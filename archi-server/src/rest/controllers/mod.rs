pub mod artifacts;
pub mod design;

pub use artifacts::ArtifactController;
pub use design::DesignController;
