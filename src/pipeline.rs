//! Analysis pipeline
//!
//! ```text
//! discover -> scan ─┬─ components ─────────────────────────────┬─> export
//!                   └─ name index -> systems -> backlinks ─────┘
//! ```
//!
//! Each stage hands an immutable value to the next. The name index is complete
//! before system discovery starts, and the backlink maps are only touched by
//! the single-threaded reduction in [`BacklinkMaps::from_systems`].

use crate::config::AnalyzerConfig;
use crate::error::Result;
use crate::export::ExportedGraph;
use crate::extract::{discover_systems, extract_components, BacklinkMaps, SystemFilter};
use crate::index::NameIndex;
use crate::model::{FoundComponent, FoundSystem};
use crate::scanner::{self, ScanDiagnostic, ScannedFile};
use crate::utils::ignore::load_ignore_file;
use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

/// Summary of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    pub files_scanned: usize,
    pub files_failed: usize,
    pub components: usize,
    pub systems: usize,
    pub skipped_debug_systems: usize,
    pub unresolved_references: usize,
    /// blake3 over every scanned file's relative path and content hash
    pub corpus_digest: String,
}

/// Everything one pass over the corpus produced
#[derive(Debug)]
pub struct Analysis {
    pub files: Vec<ScannedFile>,
    pub diagnostics: Vec<ScanDiagnostic>,
    pub index: NameIndex,
    pub components: Vec<FoundComponent>,
    pub systems: Vec<FoundSystem>,
    pub backlinks: BacklinkMaps,
    pub graph: ExportedGraph,
    pub skipped_debug_systems: usize,
    pub unresolved_references: usize,
}

impl Analysis {
    pub fn report(&self) -> AnalysisReport {
        AnalysisReport {
            files_scanned: self.files.len(),
            files_failed: self.diagnostics.len(),
            components: self.graph.components.len(),
            systems: self.graph.systems.len(),
            skipped_debug_systems: self.skipped_debug_systems,
            unresolved_references: self.unresolved_references,
            corpus_digest: corpus_digest(&self.files),
        }
    }
}

/// Runs the pipeline for one configuration
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Scan and extract without writing anything
    pub fn analyze(&self) -> Result<Analysis> {
        match self.config.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()?;
                pool.install(|| self.analyze_on_current_pool())
            }
            None => self.analyze_on_current_pool(),
        }
    }

    /// Analyze, then write both documents
    pub fn run(&self) -> Result<AnalysisReport> {
        let analysis = self.analyze()?;
        analysis.graph.write(
            &self.config.components_output_path,
            &self.config.systems_output_path,
        )?;
        Ok(analysis.report())
    }

    fn analyze_on_current_pool(&self) -> Result<Analysis> {
        let started = Instant::now();
        let root = self.config.source_root.as_path();

        let ignore_patterns = match load_ignore_file(root, &self.config.ignore_file) {
            Ok(patterns) => patterns,
            Err(e) => {
                warn!("{}; continuing without ignore patterns", e);
                Vec::new()
            }
        };

        let paths = scanner::discover_files(root, self.config.extension(), &ignore_patterns)?;
        let scanned = scanner::scan(root, &paths)?;
        let files = scanned.files;

        let (components, index) =
            rayon::join(|| extract_components(&files), || NameIndex::build(&files));

        let filter = SystemFilter {
            skip_debug_systems: self.config.skip_debug_systems,
        };
        let discovery = discover_systems(&files, &index, &filter);
        let backlinks = BacklinkMaps::from_systems(&discovery.systems);
        let graph = ExportedGraph::build(&components, &discovery.systems, &backlinks);

        info!(
            "Analyzed {} in {:.2?}: {} components, {} systems",
            root.display(),
            started.elapsed(),
            graph.components.len(),
            graph.systems.len()
        );

        Ok(Analysis {
            files,
            diagnostics: scanned.diagnostics,
            index,
            components,
            systems: discovery.systems,
            backlinks,
            graph,
            skipped_debug_systems: discovery.skipped_debug_systems,
            unresolved_references: discovery.unresolved_references,
        })
    }
}

fn corpus_digest(files: &[ScannedFile]) -> String {
    let mut hasher = blake3::Hasher::new();
    for file in files {
        hasher.update(file.relative_path.as_bytes());
        hasher.update(&[0]);
        hasher.update(file.content_hash.as_bytes());
        hasher.update(b"\n");
    }
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AtlasError;
    use crate::export::{ComponentDocument, SystemDocument};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn corpus(root: &Path) {
        write(
            root,
            "Game/Objects/Position.cs",
            r#"
using Unity.Entities;

namespace Game.Objects
{
    public struct Position : IComponentData
    {
        public float x;
        public float y;
    }
}
"#,
        );
        write(
            root,
            "Game/Objects/Velocity.cs",
            "namespace Game.Objects { public struct Velocity : IComponentData { public float x, y; } }",
        );
        write(
            root,
            "Game/Simulation/MovementSystem.cs",
            r#"
namespace Game.Simulation
{
    public class MovementSystem : GameSystemBase
    {
        private Game.Rendering.RenderSystem m_RenderSystem;

        private struct TypeHandle
        {
            [ReadOnly]
            public ComponentTypeHandle<Position> __Game_Objects_Position_RO_ComponentTypeHandle;
            public ComponentLookup<Velocity> __Game_Objects_Velocity_RW_ComponentLookup;
            public ComponentTypeHandle<UnknownThing> __Unknown;
        }

        protected override void OnCreate()
        {
            base.OnCreate();
            m_RenderSystem = base.World.GetOrCreateSystemManaged<Game.Rendering.RenderSystem>();
        }
    }
}
"#,
        );
        write(
            root,
            "Game/Rendering/RenderSystem.cs",
            "namespace Game.Rendering { public class RenderSystem : GameSystemBase { } }",
        );
        write(
            root,
            "Game/Debug/DebugOverlaySystem.cs",
            r#"
namespace Game.Debug {
    public class DebugOverlaySystem : GameSystemBase {
        protected override void OnCreate() {
            World.GetOrCreateSystemManaged<RenderSystem>();
        }
    }
}
"#,
        );
        write(root, "Game/Broken.cs", "namespace Game { class Helper { void M( { } }");
        write(root, "Game/Tests/FakeSystem.cs", "public class FakeSystem : GameSystemBase { }");
        write(root, ".atlasignore", "Tests/\n");
        write(root, "README.md", "not source");
    }

    fn config(temp_dir: &TempDir) -> AnalyzerConfig {
        let mut config = AnalyzerConfig::for_root(temp_dir.path().join("src"));
        config.components_output_path = temp_dir.path().join("out/Components.json");
        config.systems_output_path = temp_dir.path().join("out/Systems.json");
        config
    }

    #[test]
    fn test_end_to_end_graph() {
        let temp_dir = TempDir::new().unwrap();
        corpus(&temp_dir.path().join("src"));
        let config = config(&temp_dir);

        let report = Analyzer::new(config.clone()).run().unwrap();
        assert_eq!(report.files_scanned, 6);
        assert_eq!(report.files_failed, 0);
        assert_eq!(report.components, 2);
        assert_eq!(report.systems, 2);
        assert_eq!(report.skipped_debug_systems, 1);
        assert_eq!(report.unresolved_references, 1);

        let components: ComponentDocument =
            serde_json::from_str(&fs::read_to_string(&config.components_output_path).unwrap())
                .unwrap();
        let systems: SystemDocument =
            serde_json::from_str(&fs::read_to_string(&config.systems_output_path).unwrap())
                .unwrap();

        let position = &components["Game.Objects.Position"];
        assert_eq!(position.properties.len(), 2);
        assert_eq!(position.used_in_system, vec!["Game.Simulation.MovementSystem"]);
        assert_eq!(components["Game.Objects.Velocity"].properties[0].name, "x, y");

        let movement = &systems["Game.Simulation.MovementSystem"];
        assert_eq!(
            movement.component_types,
            vec!["Game.Objects.Position", "Game.Objects.Velocity"]
        );
        assert_eq!(movement.uses_system, vec!["Game.Rendering.RenderSystem"]);
        assert_eq!(
            systems["Game.Rendering.RenderSystem"].used_in_system,
            vec!["Game.Simulation.MovementSystem"]
        );
        assert!(!systems.contains_key("FakeSystem"));
    }

    #[test]
    fn test_backlinks_match_forward_references() {
        let temp_dir = TempDir::new().unwrap();
        corpus(&temp_dir.path().join("src"));
        let analysis = Analyzer::new(config(&temp_dir)).analyze().unwrap();
        let graph = &analysis.graph;

        for system in graph.systems.values() {
            for component in &system.component_types {
                assert!(graph.components[component]
                    .used_in_system
                    .contains(&system.name));
            }
            for used in &system.uses_system {
                assert!(graph.systems[used].used_in_system.contains(&system.name));
            }
        }
        for component in graph.components.values() {
            for user in &component.used_in_system {
                assert!(graph.systems[user].component_types.contains(&component.name));
            }
        }
    }

    #[test]
    fn test_runs_are_byte_identical() {
        let temp_dir = TempDir::new().unwrap();
        corpus(&temp_dir.path().join("src"));
        let config = config(&temp_dir);

        let first_report = Analyzer::new(config.clone()).run().unwrap();
        let first = fs::read(&config.systems_output_path).unwrap();
        let first_components = fs::read(&config.components_output_path).unwrap();

        let mut threaded = config.clone();
        threaded.threads = Some(2);
        let second_report = Analyzer::new(threaded).run().unwrap();

        assert_eq!(first_report, second_report);
        assert_eq!(first, fs::read(&config.systems_output_path).unwrap());
        assert_eq!(
            first_components,
            fs::read(&config.components_output_path).unwrap()
        );
    }

    #[test]
    fn test_debug_systems_kept_when_disabled() {
        let temp_dir = TempDir::new().unwrap();
        corpus(&temp_dir.path().join("src"));
        let mut config = config(&temp_dir);
        config.skip_debug_systems = false;

        let analysis = Analyzer::new(config).analyze().unwrap();
        let render = &analysis.graph.systems["Game.Rendering.RenderSystem"];
        assert_eq!(
            render.used_in_system,
            vec!["Game.Debug.DebugOverlaySystem", "Game.Simulation.MovementSystem"]
        );
    }

    #[test]
    fn test_shared_short_name_binds_to_first_seen() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("src");
        write(&root, "A/Position.cs", "namespace Game.A { public struct Position : IComponentData { } }");
        write(&root, "B/Position.cs", "namespace Game.B { public struct Position : IComponentData { } }");
        write(
            &root,
            "C/UseSystem.cs",
            "public class UseSystem : GameSystemBase { struct TypeHandle { ComponentTypeHandle<Position> h; } }",
        );

        let analysis = Analyzer::new(config(&temp_dir)).analyze().unwrap();
        assert_eq!(analysis.index.resolve("Position"), Some("Game.A.Position"));
        assert_eq!(
            analysis.graph.components["Game.A.Position"].used_in_system,
            vec!["UseSystem"]
        );
        assert!(analysis.graph.components["Game.B.Position"]
            .used_in_system
            .is_empty());
    }

    #[test]
    fn test_missing_root_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(&temp_dir);

        let result = Analyzer::new(config.clone()).run();
        assert!(matches!(result, Err(AtlasError::SourceRootMissing { .. })));
        assert!(!config.components_output_path.exists());
        assert!(!config.systems_output_path.exists());
    }

    #[test]
    fn test_digest_tracks_content() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("src");
        corpus(&root);
        let analyzer = Analyzer::new(config(&temp_dir));

        let before = analyzer.analyze().unwrap().report().corpus_digest;
        assert_eq!(before, analyzer.analyze().unwrap().report().corpus_digest);

        write(&root, "Game/Rendering/RenderSystem.cs", "namespace Game.Rendering { }");
        assert_ne!(before, analyzer.analyze().unwrap().report().corpus_digest);
    }
}
