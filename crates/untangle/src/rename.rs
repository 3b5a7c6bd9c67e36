//! S12 — Resolve module-name/directory collisions. A module
//! whose own name is the sole occupant of what would otherwise be a
//! directory collapses up into that directory name; a module whose
//! directory collides with another module's own name gets its last two
//! segments joined with an underscore instead.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::{entities::Entity, qualified_name};

fn rename_one(name: &str, mod_names: &[String], dirname_counts: &HashMap<String, usize>) -> String {
    let dirname = qualified_name::parent_name(name);

    let already_a_module = mod_names.iter().any(|m| m == &dirname);
    if !already_a_module && dirname_counts.get(&dirname).copied().unwrap_or(0) <= 1 {
        return dirname;
    }
    if already_a_module {
        return qualified_name::join_last_two_with_underscore(name);
    }
    name.to_string()
}

pub fn rename_overlapping_mod_names(renamed_modules: IndexMap<String, Vec<Entity>>) -> IndexMap<String, Vec<Entity>> {
    let mod_names: Vec<String> = renamed_modules.keys().cloned().collect();
    let mut dirname_counts: HashMap<String, usize> = HashMap::new();
    for name in &mod_names {
        *dirname_counts.entry(qualified_name::parent_name(name)).or_insert(0) += 1;
    }

    renamed_modules
        .into_iter()
        .map(|(name, contents)| (rename_one(&name, &mod_names, &dirname_counts), contents))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function(name: &str) -> Entity {
        let parsed = ruff_python_parser::parse_module("def f():\n    pass\n").unwrap();
        let ruff_python_ast::Stmt::FunctionDef(tree) = parsed.into_syntax().body.into_iter().next().unwrap() else {
            unreachable!()
        };
        Entity::Function {
            name: name.to_string(),
            tree,
            calls: Vec::new(),
            imports: Vec::new(),
            line: 1,
        }
    }

    #[test]
    fn sole_occupant_collapses_into_its_directory() {
        let mut modules = IndexMap::new();
        modules.insert("pkg.util.helper".to_string(), vec![function("pkg.util.helper")]);
        let renamed = rename_overlapping_mod_names(modules);
        assert!(renamed.contains_key("pkg.util"));
    }

    #[test]
    fn directory_collision_with_existing_module_joins_last_two_segments() {
        // "pkg.util" needs a sibling directly under "pkg" (here "pkg.other")
        // so its own dirname has more than one occupant and it is left
        // alone rather than collapsing; "pkg.util.helper" then collides
        // with "pkg.util" as a registered module name and must be renamed.
        let mut modules = IndexMap::new();
        modules.insert("pkg.util".to_string(), vec![function("pkg.util")]);
        modules.insert("pkg.other".to_string(), vec![function("pkg.other")]);
        modules.insert("pkg.util.helper".to_string(), vec![function("pkg.util.helper")]);
        let renamed = rename_overlapping_mod_names(modules);
        assert!(renamed.contains_key("pkg.util"));
        assert!(renamed.contains_key("pkg.other"));
        assert!(renamed.contains_key("pkg.util_helper"));
    }
}
