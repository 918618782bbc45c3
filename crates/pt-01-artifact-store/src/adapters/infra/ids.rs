use uuid::Uuid;

use crate::domain::ids::ArtifactId;
use crate::ports::outbound::IdGenerator;

/// Random (v4) UUID generator.
///
/// 122 random bits per id; collisions over the lifetime of a temporary store
/// are not a practical concern, and the store rejects one if it ever happens.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> ArtifactId {
        ArtifactId::from_uuid(Uuid::new_v4())
    }
}
