//! Read-only seam to whatever loads meshes and levels.

use crate::components::Renderable;
use crate::level::Level;

pub trait AssetProvider {
    fn mesh(&self, name: &str) -> Option<Renderable>;
    fn level(&self, name: &str) -> Option<Level>;
    /// True once every asset is available.
    fn done(&self) -> bool;
}

/// Meshes and levels compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinAssets;

impl BuiltinAssets {
    pub const MESHES: [&'static str; 5] = ["player", "wall", "bullet", "jetpack", "ammo"];
}

impl AssetProvider for BuiltinAssets {
    fn mesh(&self, name: &str) -> Option<Renderable> {
        Self::MESHES
            .contains(&name)
            .then(|| Renderable::new(name))
    }

    fn level(&self, name: &str) -> Option<Level> {
        match name {
            "arena" => Some(Level::arena()),
            _ => None,
        }
    }

    fn done(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_assets() {
        let assets = BuiltinAssets;
        assert!(assets.done());
        assert_eq!(assets.mesh("wall"), Some(Renderable::new("wall")));
        assert_eq!(assets.mesh("tree"), None);
        assert_eq!(assets.level("arena"), Some(Level::arena()));
        assert!(assets.level("missing").is_none());
    }
}
