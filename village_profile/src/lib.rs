mod aggregate;
mod config;
pub mod manual;
mod registry;
mod tokenizer;

use log::{debug, warn};

pub use crate::aggregate::*;
pub use crate::config::*;
pub use crate::registry::*;
pub use crate::tokenizer::tokenize;

/// Decodes a grid with the layout of the village profile sheets.
///
/// Missing rows and columns are treated as empty cells, so this function
/// accepts any grid. Decoding the same grid always returns the same profile.
///
/// ```
/// use village_profile::*;
///
/// let grid = tokenize("Deskripsi,,,Profil,Isi\nDesa nelayan,,,Luas,12 km2\n");
/// let profile = decode(&grid);
/// assert_eq!(profile.description, "Desa nelayan");
/// assert_eq!(profile.profile_items[0].title, "Luas");
/// assert_eq!(profile.profile_items[0].body, "12 km2");
/// assert!(profile.category(CategorySlot::Agro).is_empty());
/// ```
pub fn decode(grid: &Grid) -> VillageProfile {
    decode_with_schema(grid, &LayoutSchema::VILLAGE_LAYOUT)
}

/// Decodes a grid by applying each rule of the schema in order.
pub fn decode_with_schema(grid: &Grid, schema: &LayoutSchema) -> VillageProfile {
    let mut profile = VillageProfile::empty();
    for rule in schema.rules {
        apply_rule(&mut profile, grid, rule);
    }
    debug!(
        "decode: {} rows, {} profile items, categories: {:?}",
        grid.len(),
        profile.profile_items.len(),
        profile
            .categories
            .iter()
            .map(|c| (c.issues.len(), c.potentials.len(), c.projects.len()))
            .collect::<Vec<_>>()
    );
    profile
}

/// Fills the part of the profile that the rule targets.
///
/// Scalar targets (description, school) overwrite their value. List targets
/// append to the existing lists.
pub fn apply_rule(profile: &mut VillageProfile, grid: &Grid, rule: &FieldRule) {
    if rule.columns.len() < rule.target.arity() {
        warn!(
            "apply_rule: {:?} expects {} columns, got {:?}",
            rule.target,
            rule.target.arity(),
            rule.columns
        );
    }
    let cell = |row: usize, pos: usize| {
        rule.columns
            .get(pos)
            .and_then(|col| grid.cell(row, *col))
    };

    match rule.target {
        Target::Description => {
            profile.description = cell(rule.rows.first, 0).unwrap_or_default().to_string();
        }
        Target::School => {
            profile.school = SchoolInfo {
                name: cell(rule.rows.first, 0).unwrap_or_default().to_string(),
                address: cell(rule.rows.first, 1).unwrap_or_default().to_string(),
            };
        }
        Target::ProfileItems => {
            for row in rule.rows.indexes(grid.len()) {
                if let Some(title) = present(cell(row, 0)) {
                    profile.profile_items.push(ProfileItem {
                        title: title.to_string(),
                        body: cell(row, 1).unwrap_or_default().to_string(),
                    });
                } else if present(cell(row, 1)).is_some() {
                    debug!("apply_rule: row {}: profile item without a title", row);
                }
            }
        }
        Target::Category(slot) => {
            let category = &mut profile.categories[slot.index()];
            for row in rule.rows.indexes(grid.len()) {
                let lists = [
                    &mut category.issues,
                    &mut category.potentials,
                    &mut category.projects,
                ];
                for (pos, list) in lists.into_iter().enumerate() {
                    if let Some(s) = present(cell(row, pos)) {
                        list.push(s.to_string());
                    }
                }
            }
        }
    }
}

// The value itself is returned as-is: only the emptiness check is trimmed.
// A byte order mark counts as blank, like whitespace.
fn present(cell: Option<&str>) -> Option<&str> {
    cell.filter(|s| {
        !s.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
            .is_empty()
    })
}
