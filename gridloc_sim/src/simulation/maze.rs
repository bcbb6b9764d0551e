// gridloc_sim/src/simulation/maze.rs

//! Reading maze text files from disk, either one at a time or as a catalog of
//! every `.maz` file under a directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use gridloc_core::prelude::Grid;
use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::error::SimError;
use crate::simulation::config::MazeSection;

/// File extension for maze text files.
pub const MAZE_EXTENSION: &str = "maz";

/// Reads and parses a single maze file.
pub fn load_maze(path: &Path) -> Result<Grid, SimError> {
    let text = std::fs::read_to_string(path).map_err(|source| SimError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let grid = Grid::parse(&text).map_err(|source| SimError::MazeLoad {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        "Loaded {}x{} maze from {:?} ({} obstacles)",
        grid.width(),
        grid.height(),
        path,
        grid.count_obstacles()
    );
    Ok(grid)
}

/// Every maze found under a directory, keyed by a dotted name built from its
/// path (e.g. `tutorial.corridor` for `tutorial/corridor.maz`).
#[derive(Debug, Default)]
pub struct MazeCatalog {
    root: PathBuf,
    mazes: HashMap<String, Grid>,
}

impl MazeCatalog {
    /// Walks `root` and loads every `.maz` file. Files that fail to load are
    /// logged and skipped.
    pub fn load_from_dir(root: &Path) -> Self {
        let mut catalog = Self {
            root: root.to_path_buf(),
            mazes: HashMap::new(),
        };
        if !root.exists() {
            warn!(
                "Maze catalog directory not found at {:?}, no mazes will be loaded.",
                root
            );
            return catalog;
        }

        info!("Loading maze catalog from: {:?}", root);

        for entry in WalkDir::new(root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| {
                !e.file_type().is_dir()
                    && e.path().extension().is_some_and(|ext| ext == MAZE_EXTENSION)
            })
        {
            let path = entry.path();
            let Some(key) = catalog_key(root, path) else {
                warn!("Skipping maze outside the catalog root: {:?}", path);
                continue;
            };

            match load_maze(path) {
                Ok(grid) => {
                    info!("Loaded catalog maze: '{}'", key);
                    catalog.mazes.insert(key, grid);
                }
                Err(e) => {
                    error!("Failed to load catalog maze from {:?}: {}", path, e);
                }
            }
        }
        catalog
    }

    pub fn get(&self, name: &str) -> Option<&Grid> {
        self.mazes.get(name)
    }

    /// Catalog names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.mazes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.mazes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mazes.is_empty()
    }
}

fn catalog_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    Some(
        relative
            .with_extension("")
            .to_string_lossy()
            .replace(std::path::MAIN_SEPARATOR, "."),
    )
}

/// Loads the maze a scenario points at, by file or by catalog name.
pub fn resolve_maze(section: &MazeSection) -> Result<Grid, SimError> {
    if let Some(file) = &section.file {
        return load_maze(file);
    }

    let name = section.name.as_deref().unwrap_or_default();
    let catalog = MazeCatalog::load_from_dir(&section.catalog_dir);
    catalog
        .get(name)
        .cloned()
        .ok_or_else(|| SimError::UnknownMaze {
            name: name.to_string(),
            catalog: catalog.root.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridloc_core::prelude::{Cell, Color, GridCoord, LoadError};
    use std::fs;

    #[test]
    fn loads_a_maze_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.maz");
        fs::write(&path, "r#\ngb\n").unwrap();

        let grid = load_maze(&path).unwrap();
        assert_eq!(grid.width(), 2);
        assert_eq!(
            grid.color_at(GridCoord::new(0, 1)).unwrap(),
            Cell::Free(Color::Red)
        );
    }

    #[test]
    fn reports_io_and_parse_failures() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_maze(&dir.path().join("missing.maz")),
            Err(SimError::Io { .. })
        ));

        let ragged = dir.path().join("ragged.maz");
        fs::write(&ragged, "rgb\nr\n").unwrap();
        assert!(matches!(
            load_maze(&ragged),
            Err(SimError::MazeLoad {
                source: LoadError::RaggedRow { line: 2, .. },
                ..
            })
        ));
    }

    #[test]
    fn catalog_keys_follow_directories_and_skip_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("tutorial")).unwrap();
        fs::write(dir.path().join("simple.maz"), "rg\nby\n").unwrap();
        fs::write(dir.path().join("tutorial").join("corridor.maz"), "rgby\n").unwrap();
        fs::write(dir.path().join("broken.maz"), "rq\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "not a maze").unwrap();

        let catalog = MazeCatalog::load_from_dir(dir.path());
        assert_eq!(catalog.names(), vec!["simple", "tutorial.corridor"]);
        assert_eq!(catalog.get("tutorial.corridor").unwrap().width(), 4);
    }

    #[test]
    fn bundled_mazes_all_load() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../assets/mazes");
        let catalog = MazeCatalog::load_from_dir(&root);
        assert_eq!(catalog.names(), vec!["rooms", "simple", "tutorial.corridor"]);
        assert_eq!(catalog.get("simple").unwrap().count_obstacles(), 2);
    }

    #[test]
    fn resolves_by_name_or_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("simple.maz"), "rg\n").unwrap();

        let by_name = MazeSection {
            file: None,
            name: Some("simple".into()),
            catalog_dir: dir.path().to_path_buf(),
        };
        assert_eq!(resolve_maze(&by_name).unwrap().width(), 2);

        let by_file = MazeSection {
            file: Some(dir.path().join("simple.maz")),
            name: None,
            catalog_dir: PathBuf::from("unused"),
        };
        assert_eq!(resolve_maze(&by_file).unwrap().height(), 1);

        let unknown = MazeSection {
            name: Some("nope".into()),
            ..by_name
        };
        assert!(matches!(
            resolve_maze(&unknown),
            Err(SimError::UnknownMaze { .. })
        ));
    }
}
