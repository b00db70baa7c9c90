// ********* Input data structures ***********

use std::ops::Range;

/// One line of the spreadsheet, as a list of raw fields.
pub type Row = Vec<String>;

/// The rows of a CSV export, as produced by [crate::tokenize].
///
/// Rows may have different lengths. The fields are kept exactly as they were
/// read (quotes removed, no trimming). A grid cannot be modified once built.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Grid {
    rows: Vec<Row>,
}

impl Grid {
    pub fn new(rows: Vec<Row>) -> Grid {
        Grid { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, idx: usize) -> Option<&Row> {
        self.rows.get(idx)
    }

    /// The raw content of a cell, or `None` if the row or the column does not exist.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Vec<Row>> for Grid {
    fn from(rows: Vec<Row>) -> Grid {
        Grid::new(rows)
    }
}

/// Identifies a data source: a display name and the key used to retrieve it
/// (a sheet id, a file path, ...).
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct SourceDescriptor {
    pub name: String,
    pub key: String,
}

impl SourceDescriptor {
    pub fn new(name: &str, key: &str) -> SourceDescriptor {
        SourceDescriptor {
            name: name.to_string(),
            key: key.to_string(),
        }
    }
}

/// The raw content of one source.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Dataset {
    pub name: String,
    pub grid: Grid,
}

impl Dataset {
    pub fn new(name: &str, grid: Grid) -> Dataset {
        Dataset {
            name: name.to_string(),
            grid,
        }
    }

    /// The first row, or an empty row for an empty grid.
    pub fn header_row(&self) -> &[String] {
        self.grid.row(0).map(|r| r.as_slice()).unwrap_or(&[])
    }

    /// All the rows after the header.
    pub fn body_rows(&self) -> &[Row] {
        self.grid.rows().get(1..).unwrap_or(&[])
    }
}

// ******** Output data structures *********

/// One entry of the "Profil Desa" list.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ProfileItem {
    pub title: String,
    pub body: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct SchoolInfo {
    pub name: String,
    pub address: String,
}

/// The four analysis groupings of a profile, in the order of the spreadsheet columns.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum CategorySlot {
    /// Science and technology.
    Saintek,
    /// Agriculture.
    Agro,
    /// Social welfare.
    Kesra,
    /// Social sciences and humanities.
    Soshum,
}

impl CategorySlot {
    pub const ALL: [CategorySlot; 4] = [
        CategorySlot::Saintek,
        CategorySlot::Agro,
        CategorySlot::Kesra,
        CategorySlot::Soshum,
    ];

    pub fn index(self) -> usize {
        match self {
            CategorySlot::Saintek => 0,
            CategorySlot::Agro => 1,
            CategorySlot::Kesra => 2,
            CategorySlot::Soshum => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CategorySlot::Saintek => "SAINTEK",
            CategorySlot::Agro => "AGRO",
            CategorySlot::Kesra => "KESRA",
            CategorySlot::Soshum => "SOSHUM",
        }
    }
}

/// Issues, potentials and projects of one category.
///
/// The three lists are filled independently: the i-th issue is not related
/// to the i-th potential.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ThematicCategory {
    pub name: String,
    pub issues: Vec<String>,
    pub potentials: Vec<String>,
    pub projects: Vec<String>,
}

impl ThematicCategory {
    pub fn new(slot: CategorySlot) -> ThematicCategory {
        ThematicCategory {
            name: slot.label().to_string(),
            ..Default::default()
        }
    }

    /// True when none of the lists has an entry.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty() && self.potentials.is_empty() && self.projects.is_empty()
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VillageProfile {
    pub description: String,
    pub profile_items: Vec<ProfileItem>,
    pub school: SchoolInfo,
    pub categories: [ThematicCategory; 4],
}

impl VillageProfile {
    /// A profile with no content and the four named categories.
    pub fn empty() -> VillageProfile {
        VillageProfile {
            description: String::new(),
            profile_items: Vec::new(),
            school: SchoolInfo::default(),
            categories: CategorySlot::ALL.map(ThematicCategory::new),
        }
    }

    pub fn category(&self, slot: CategorySlot) -> &ThematicCategory {
        &self.categories[slot.index()]
    }
}

// ********* Layout schema **********

/// What a rule of the layout fills in the profile.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Target {
    /// Reads `[text]`.
    Description,
    /// Reads `[title, body]` on every row of the span.
    ProfileItems,
    /// Reads `[name, address]`.
    School,
    /// Reads `[issues, potentials, projects]` on every row of the span.
    Category(CategorySlot),
}

impl Target {
    /// The number of columns this target reads.
    pub fn arity(self) -> usize {
        match self {
            Target::Description => 1,
            Target::ProfileItems => 2,
            Target::School => 2,
            Target::Category(_) => 3,
        }
    }
}

/// An inclusive span of rows. An open span runs to the last row of the grid.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct RowSpan {
    pub first: usize,
    pub last: Option<usize>,
}

impl RowSpan {
    pub const fn single(row: usize) -> RowSpan {
        RowSpan {
            first: row,
            last: Some(row),
        }
    }

    pub const fn between(first: usize, last: usize) -> RowSpan {
        RowSpan {
            first,
            last: Some(last),
        }
    }

    pub const fn open(first: usize) -> RowSpan {
        RowSpan { first, last: None }
    }

    /// The row indexes of the span that exist in a grid of `num_rows` rows.
    pub fn indexes(&self, num_rows: usize) -> Range<usize> {
        let end = match self.last {
            Some(last) => num_rows.min(last.saturating_add(1)),
            None => num_rows,
        };
        self.first..end.max(self.first)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct FieldRule {
    pub target: Target,
    pub rows: RowSpan,
    /// The columns read by the target, in the order documented on [Target].
    pub columns: &'static [usize],
}

/// The coordinates of all the fields of a profile in the spreadsheet.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct LayoutSchema {
    pub rules: &'static [FieldRule],
}

impl LayoutSchema {
    /// The layout of the village profile sheets.
    ///
    /// Row 0 holds the headers, rows 1 to 8 the general profile, row 12 the
    /// category headers and the category entries start at row 13.
    pub const VILLAGE_LAYOUT: LayoutSchema = LayoutSchema {
        rules: &[
            FieldRule {
                target: Target::Description,
                rows: RowSpan::single(1),
                columns: &[0],
            },
            FieldRule {
                target: Target::ProfileItems,
                rows: RowSpan::between(1, 8),
                columns: &[3, 4],
            },
            FieldRule {
                target: Target::School,
                rows: RowSpan::single(1),
                columns: &[6, 7],
            },
            FieldRule {
                target: Target::Category(CategorySlot::Saintek),
                rows: RowSpan::open(13),
                columns: &[0, 1, 2],
            },
            FieldRule {
                target: Target::Category(CategorySlot::Agro),
                rows: RowSpan::open(13),
                columns: &[3, 4, 5],
            },
            FieldRule {
                target: Target::Category(CategorySlot::Kesra),
                rows: RowSpan::open(13),
                columns: &[6, 7, 8],
            },
            FieldRule {
                target: Target::Category(CategorySlot::Soshum),
                rows: RowSpan::open(13),
                columns: &[9, 10, 11],
            },
        ],
    };
}
