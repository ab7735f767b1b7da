pub mod floor_manager;
pub mod layout;
pub mod placement;

use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};

/// Root seed of a run. Every level derives its own seed from it, so a
/// revisited depth is rebuilt identically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonSeed {
    pub seed: u64,
}

impl Default for DungeonSeed {
    fn default() -> Self {
        Self { seed: 42 }
    }
}

impl DungeonSeed {
    /// Deterministic level seed from run seed and depth
    pub fn level_seed(&self, depth: u32) -> u64 {
        let mut hasher = Sha3_256::new();
        hasher.update(self.seed.to_le_bytes());
        hasher.update(depth.to_le_bytes());
        let digest = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(bytes)
    }
}
