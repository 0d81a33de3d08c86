// System Extraction
//
// A system is any declaration whose FQN carries the system marker on at least
// one of its parts. Two
// syntactic probes recover its dependencies:
// - handle fields of the nested `TypeHandle` struct name the components it touches
// - `GetOrCreateSystemManaged<T>()` calls in `OnCreate` name the systems it uses
//
// Discovery is pure and runs per file on the rayon pool. References the name
// index cannot resolve are dropped.

use super::{marked_names, merge_by_name};
use crate::index::NameIndex;
use crate::markers::{
    Marker, DEBUG_MARKER, GET_OR_CREATE_SYSTEM, HANDLE_GENERICS, ON_CREATE, TYPE_HANDLE_STRUCT,
};
use crate::model::{Declaration, DeclarationKind, FoundSystem};
use crate::scanner::ScannedFile;
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::{debug, info};

/// Which systems discovery keeps
#[derive(Debug, Clone, Copy)]
pub struct SystemFilter {
    /// Skip systems whose FQN contains "Debug"
    pub skip_debug_systems: bool,
}

impl Default for SystemFilter {
    fn default() -> Self {
        Self {
            skip_debug_systems: true,
        }
    }
}

impl SystemFilter {
    pub fn keeps(&self, fully_qualified_name: &str) -> bool {
        !(self.skip_debug_systems && fully_qualified_name.contains(DEBUG_MARKER))
    }
}

/// Systems found in the corpus plus bookkeeping for the run report
#[derive(Debug, Default)]
pub struct SystemDiscovery {
    pub systems: Vec<FoundSystem>,
    pub skipped_debug_systems: usize,
    pub unresolved_references: usize,
}

#[derive(Default)]
struct FileSystems {
    systems: Vec<FoundSystem>,
    unresolved: usize,
}

/// Discover every system and its forward references
///
/// `index` must be complete; it is only read here.
pub fn discover_systems(
    files: &[ScannedFile],
    index: &NameIndex,
    filter: &SystemFilter,
) -> SystemDiscovery {
    let marked = marked_names(files, Marker::GameSystem);
    let skipped_debug_systems = marked.iter().filter(|name| !filter.keeps(name)).count();

    let per_file: Vec<FileSystems> = files
        .par_iter()
        .map(|file| systems_in_file(file, &marked, index, filter))
        .collect();

    let unresolved_references = per_file.iter().map(|f| f.unresolved).sum();

    let systems = merge_by_name(
        per_file.into_iter().flat_map(|f| f.systems),
        |s| s.name.as_str(),
        |into, partial| {
            into.component_types.extend(partial.component_types);
            into.uses_system.extend(partial.uses_system);
        },
    );

    info!("Found {} Systems", systems.len());
    if skipped_debug_systems > 0 {
        debug!("Skipped {} debug systems", skipped_debug_systems);
    }

    SystemDiscovery {
        systems,
        skipped_debug_systems,
        unresolved_references,
    }
}

fn systems_in_file(
    file: &ScannedFile,
    marked: &HashSet<&str>,
    index: &NameIndex,
    filter: &SystemFilter,
) -> FileSystems {
    let mut found = FileSystems::default();

    for declaration in file.all_declarations() {
        let name = declaration.fully_qualified_name.as_str();
        if !marked.contains(name) || !filter.keeps(name) {
            continue;
        }

        let mut resolver = Resolver {
            index,
            unresolved: 0,
        };
        let system = FoundSystem {
            name: declaration.fully_qualified_name.clone(),
            component_types: component_types(declaration, &mut resolver),
            uses_system: used_systems(declaration, &mut resolver),
        };
        found.unresolved += resolver.unresolved;
        found.systems.push(system);
    }

    found
}

struct Resolver<'a> {
    index: &'a NameIndex,
    unresolved: usize,
}

impl Resolver<'_> {
    fn resolve(&mut self, owner: &str, type_text: &str) -> Option<String> {
        let resolved = self.index.resolve(type_text).map(str::to_string);
        if resolved.is_none() {
            self.unresolved += 1;
            debug!("{}: unresolved reference to {}", owner, type_text);
        }
        resolved
    }
}

/// The nested `TypeHandle` struct, searched at any depth
fn type_handle(system: &Declaration) -> Option<&Declaration> {
    system
        .walk()
        .skip(1)
        .find(|d| d.kind == DeclarationKind::Struct && d.short_name == TYPE_HANDLE_STRUCT)
}

/// Components named by `ComponentTypeHandle<T>` / `ComponentLookup<T>` handle fields
fn component_types(system: &Declaration, resolver: &mut Resolver) -> Vec<String> {
    let Some(handle) = type_handle(system) else {
        return Vec::new();
    };

    handle
        .fields
        .iter()
        .filter_map(|field| {
            HANDLE_GENERICS
                .iter()
                .find_map(|generic| field.type_syntax.generic_argument_of(generic))
        })
        .filter_map(|argument| resolver.resolve(&system.fully_qualified_name, argument))
        .collect()
}

/// Systems acquired with `GetOrCreateSystemManaged<T>()` inside `OnCreate`
fn used_systems(system: &Declaration, resolver: &mut Resolver) -> Vec<String> {
    let Some(on_create) = system.find_method(ON_CREATE) else {
        return Vec::new();
    };

    on_create
        .invocations
        .iter()
        .filter(|call| call.member_name == GET_OR_CREATE_SYSTEM)
        .filter_map(|call| call.type_arguments.first())
        .filter_map(|argument| resolver.resolve(&system.fully_qualified_name, argument))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::new_parser;
    use crate::scanner::extract_declarations;
    use std::path::PathBuf;

    fn file(relative: &str, source: &str) -> ScannedFile {
        let tree = new_parser().unwrap().parse(source, None).unwrap();
        ScannedFile {
            path: PathBuf::from(relative),
            relative_path: relative.to_string(),
            content_hash: String::new(),
            declarations: extract_declarations(&tree, source),
        }
    }

    fn discover(files: &[ScannedFile], skip_debug: bool) -> SystemDiscovery {
        let index = NameIndex::build(files);
        discover_systems(
            files,
            &index,
            &SystemFilter {
                skip_debug_systems: skip_debug,
            },
        )
    }

    const COMPONENTS: &str = r#"
namespace Game.Objects {
    public struct Position : IComponentData { public float x; public float y; }
    public struct Velocity : IComponentData { public float3 m_Value; }
}
"#;

    #[test]
    fn test_component_handles_resolve() {
        let files = vec![
            file("Components.cs", COMPONENTS),
            file(
                "MovementSystem.cs",
                r#"
namespace Game.Simulation {
    public class MovementSystem : GameSystemBase {
        private struct TypeHandle {
            [ReadOnly]
            public ComponentTypeHandle<Position> __Position_RO;
            public ComponentLookup<Game.Objects.Velocity> __Velocity_RW;
            public BufferLookup<Position> __Ignored;
            public EntityTypeHandle __Entity;
        }
    }
}
"#,
            ),
        ];
        let discovery = discover(&files, true);

        assert_eq!(discovery.systems.len(), 1);
        let system = &discovery.systems[0];
        assert_eq!(system.name, "Game.Simulation.MovementSystem");
        assert_eq!(
            system.component_types,
            vec!["Game.Objects.Position", "Game.Objects.Velocity"]
        );
        assert!(system.uses_system.is_empty());
    }

    #[test]
    fn test_on_create_system_usage() {
        let files = vec![file(
            "Systems.cs",
            r#"
namespace Game.Rendering {
    public class RenderSystem : GameSystemBase { }
    public class CameraSystem : GameSystemBase {
        private RenderSystem m_Render;
        protected override void OnCreate() {
            base.OnCreate();
            m_Render = base.World.GetOrCreateSystemManaged<RenderSystem>();
            base.World.GetOrCreateSystemManaged<MissingSystem>();
        }
        protected override void OnUpdate() {
            base.World.GetOrCreateSystemManaged<CameraSystem>();
        }
    }
}
"#,
        )];
        let discovery = discover(&files, true);
        let camera = discovery
            .systems
            .iter()
            .find(|s| s.name == "Game.Rendering.CameraSystem")
            .unwrap();

        assert_eq!(camera.uses_system, vec!["Game.Rendering.RenderSystem"]);
        assert_eq!(discovery.unresolved_references, 1);
    }

    #[test]
    fn test_missing_structure_yields_empty_lists() {
        let files = vec![file("Bare.cs", "public class BareSystem : GameSystemBase { }")];
        let discovery = discover(&files, true);

        assert_eq!(discovery.systems.len(), 1);
        assert!(discovery.systems[0].component_types.is_empty());
        assert!(discovery.systems[0].uses_system.is_empty());
        assert_eq!(discovery.unresolved_references, 0);
    }

    #[test]
    fn test_debug_systems_skipped_by_default() {
        let files = vec![file(
            "Debug.cs",
            r#"
namespace Game.Debug {
    public class OverlaySystem : GameSystemBase { }
}
namespace Game.Tools {
    public class DebugToolSystem : GameSystemBase { }
    public class BulldozeToolSystem : GameSystemBase { }
}
"#,
        )];

        let skipped = discover(&files, true);
        let names: Vec<&str> = skipped.systems.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Game.Tools.BulldozeToolSystem"]);
        assert_eq!(skipped.skipped_debug_systems, 2);

        let kept = discover(&files, false);
        assert_eq!(kept.systems.len(), 3);
        assert_eq!(kept.skipped_debug_systems, 0);
    }

    #[test]
    fn test_duplicate_handles_are_kept() {
        let files = vec![
            file("Components.cs", COMPONENTS),
            file(
                "Twice.cs",
                r#"
public class TwiceSystem : GameSystemBase {
    private struct TypeHandle {
        public ComponentTypeHandle<Position> __Position_RO;
        public ComponentLookup<Position> __Position_Lookup;
    }
}
"#,
            ),
        ];
        let discovery = discover(&files, true);
        assert_eq!(
            discovery.systems[0].component_types,
            vec!["Game.Objects.Position", "Game.Objects.Position"]
        );
    }

    #[test]
    fn test_qualified_handle_binds_to_named_namespace() {
        let files = vec![
            file("A/Position.cs", "namespace Game.A { public struct Position : IComponentData { } }"),
            file("B/Position.cs", "namespace Game.B { public struct Position : IComponentData { } }"),
            file(
                "C/S.cs",
                r#"
namespace Game.C {
    public class S : GameSystemBase {
        private struct TypeHandle {
            public ComponentTypeHandle<Game.B.Position> __Game_B_Position;
            public ComponentTypeHandle<Position> __Position;
        }
    }
}
"#,
            ),
        ];
        let discovery = discover(&files, true);
        assert_eq!(
            discovery.systems[0].component_types,
            vec!["Game.B.Position", "Game.A.Position"]
        );
    }

    #[test]
    fn test_constructed_generic_argument_dropped() {
        let files = vec![file(
            "F.cs",
            r#"
namespace Game.F {
    public struct Wrap<T> { }
    public struct Pos : IComponentData { }
    public class WrapSystem : GameSystemBase {
        private struct TypeHandle {
            public ComponentLookup<Wrap<Pos>> __Wrapped;
            public ComponentTypeHandle<Pos> __Pos;
        }
    }
}
"#,
        )];
        let discovery = discover(&files, true);
        assert_eq!(discovery.systems[0].component_types, vec!["Game.F.Pos"]);
        assert_eq!(discovery.unresolved_references, 1);
    }

    #[test]
    fn test_partial_system_parts_merge() {
        let files = vec![
            file("Components.cs", COMPONENTS),
            file("S1.cs", "namespace Game { public partial class SplitSystem : GameSystemBase { } }"),
            file(
                "S2.cs",
                r#"
namespace Game {
    public partial class SplitSystem {
        private struct TypeHandle { public ComponentTypeHandle<Position> __Position; }
    }
}
"#,
            ),
            file("S3.cs", "namespace Game.Debug { public partial class Overlay : GameSystemBase { } }"),
            file("S4.cs", "namespace Game.Debug { public partial class Overlay : GameSystemBase { } }"),
        ];
        let discovery = discover(&files, true);

        assert_eq!(discovery.systems.len(), 1);
        assert_eq!(discovery.systems[0].name, "Game.SplitSystem");
        assert_eq!(discovery.systems[0].component_types, vec!["Game.Objects.Position"]);
        assert_eq!(discovery.skipped_debug_systems, 1);
    }

    #[test]
    fn test_non_system_declarations_ignored() {
        let files = vec![file(
            "Plain.cs",
            r#"
public class NotASystem : SystemBase {
    private struct TypeHandle { public ComponentTypeHandle<NotASystem> h; }
}
"#,
        )];
        assert!(discover(&files, true).systems.is_empty());
    }
}
