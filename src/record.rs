// src/record.rs
//
// One canonical listing row and its fixed on-disk column layout.
// Absence is always an empty cell on disk; in memory it is `None` or "".

/// Persisted column order. The first column (row index) has an empty name.
pub const HEADERS: [&str; 32] = [
    "",
    "id", "name", "cardType", "assetId", "definitionId", "rating",
    "teamId", "leagueId", "nationId", "rarityId", "ratingTier",
    "isDuplicate", "isStorage", "preferredPosition", "possiblePositions", "groups",
    "isFixed", "concept", "price", "futggPrice", "maxChem", "normalizeClubId",
    "teamChem.calculationType", "teamChem.contribution", "teamChem.parameterId",
    "leagueChem.calculationType", "leagueChem.contribution", "leagueChem.parameterId",
    "nationChem.calculationType", "nationChem.contribution", "nationChem.parameterId",
];

/// Key column; rows without it are kept but never matched.
pub const ID_COLUMN: &str = "id";

/// The only value `max_chem` can hold.
pub const FULL_CHEM: u8 = 3;

pub const POSITION_SEP: char = '|';

/// Positions of the two price cells in `HEADERS`; the only cells an update rewrites.
pub const PRICE_CELL: usize = 19;
pub const SOURCE_PRICE_CELL: usize = 20;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Positions {
    pub preferred: String,
    /// Preferred first (when set), then alternates. Never holds empty entries.
    pub possible: Vec<String>,
}

impl Positions {
    pub fn new(preferred: &str, alternates: &[String]) -> Self {
        let possible = std::iter::once(preferred)
            .chain(alternates.iter().map(String::as_str))
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect();
        Self { preferred: s!(preferred.trim()), possible }
    }

    pub fn joined(&self) -> String {
        self.possible.join(&POSITION_SEP.to_string())
    }

    fn from_cells(preferred: &str, possible: &str) -> Self {
        Self {
            preferred: s!(preferred),
            possible: possible
                .split(POSITION_SEP)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect(),
        }
    }
}

/// One chemistry axis: (calculation type, contribution, parameter id).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Chem {
    pub calculation_type: String,
    pub contribution: Option<i64>,
    pub parameter_id: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    /// Assigned by the store on append; `None` until then.
    pub row: Option<u64>,
    pub id: String,
    pub name: String,
    pub card_type: String,
    pub asset_id: String,
    pub definition_id: String,
    pub rating: Option<i64>,
    pub team_id: String,
    pub league_id: String,
    pub nation_id: String,
    pub rarity_id: String,
    pub rating_tier: String,
    pub is_duplicate: String,
    pub is_storage: String,
    pub positions: Positions,
    pub groups: String,
    pub is_fixed: String,
    pub concept: Option<bool>,
    /// Numeric text. Never "0" for "no price".
    pub price: Option<String>,
    /// Mirrors `price`; written together, never separately.
    pub source_price: Option<String>,
    pub max_chem: Option<u8>,
    pub normalize_club_id: String,
    pub team_chem: Chem,
    pub league_chem: Chem,
    pub nation_chem: Chem,
}

impl Record {
    /// A record with an empty identifier cannot be stored or matched.
    pub fn is_mappable(&self) -> bool {
        !self.id.is_empty()
    }

    /// Set both price cells at once.
    pub fn set_price(&mut self, price: Option<String>) {
        self.source_price = price.clone();
        self.price = price;
    }

    /// Price as a number for comparison. Empty or non-numeric counts as 0.
    pub fn price_value(&self) -> f64 {
        price_value(self.price.as_deref())
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() { "Unknown" } else { &self.name }
    }

    /// Cells in `HEADERS` order.
    pub fn to_row(&self) -> Vec<String> {
        let mut row = Vec::with_capacity(HEADERS.len());
        row.push(opt(self.row));
        row.push(self.id.clone());
        row.push(self.name.clone());
        row.push(self.card_type.clone());
        row.push(self.asset_id.clone());
        row.push(self.definition_id.clone());
        row.push(opt(self.rating));
        row.push(self.team_id.clone());
        row.push(self.league_id.clone());
        row.push(self.nation_id.clone());
        row.push(self.rarity_id.clone());
        row.push(self.rating_tier.clone());
        row.push(self.is_duplicate.clone());
        row.push(self.is_storage.clone());
        row.push(self.positions.preferred.clone());
        row.push(self.positions.joined());
        row.push(self.groups.clone());
        row.push(self.is_fixed.clone());
        row.push(self.concept.map(bool_cell).unwrap_or_default());
        row.push(self.price.clone().unwrap_or_default());
        row.push(self.source_price.clone().unwrap_or_default());
        row.push(opt(self.max_chem));
        row.push(self.normalize_club_id.clone());
        for chem in [&self.team_chem, &self.league_chem, &self.nation_chem] {
            row.push(chem.calculation_type.clone());
            row.push(opt(chem.contribution));
            row.push(chem.parameter_id.clone());
        }
        row
    }

    /// Read view of a persisted row, `cells` in `HEADERS` order
    /// (see [`ColumnMap::project`]). Cells that do not fit a typed field read
    /// as absent; the text itself is left to the caller.
    pub fn from_cells(cells: &[String]) -> Self {
        let cell = |name: &str| -> &str {
            HEADERS
                .iter()
                .position(|h| *h == name)
                .and_then(|i| cells.get(i))
                .map(String::as_str)
                .unwrap_or("")
        };
        let chem = |prefix: &str| Chem {
            calculation_type: s!(cell(&format!("{prefix}.calculationType"))),
            contribution: parse_int_cell(cell(&format!("{prefix}.contribution"))),
            parameter_id: s!(cell(&format!("{prefix}.parameterId"))),
        };

        Self {
            row: parse_int_cell(cell("")),
            id: s!(cell("id").trim()),
            name: s!(cell("name")),
            card_type: s!(cell("cardType")),
            asset_id: s!(cell("assetId")),
            definition_id: s!(cell("definitionId").trim()),
            rating: parse_int_cell(cell("rating")),
            team_id: s!(cell("teamId")),
            league_id: s!(cell("leagueId")),
            nation_id: s!(cell("nationId")),
            rarity_id: s!(cell("rarityId")),
            rating_tier: s!(cell("ratingTier")),
            is_duplicate: s!(cell("isDuplicate")),
            is_storage: s!(cell("isStorage")),
            positions: Positions::from_cells(cell("preferredPosition"), cell("possiblePositions")),
            groups: s!(cell("groups")),
            is_fixed: s!(cell("isFixed")),
            concept: parse_bool_cell(cell("concept")),
            price: non_empty(cell("price")),
            source_price: non_empty(cell("futggPrice")),
            max_chem: parse_int_cell(cell("maxChem")),
            normalize_club_id: s!(cell("normalizeClubId")),
            team_chem: chem("teamChem"),
            league_chem: chem("leagueChem"),
            nation_chem: chem("nationChem"),
        }
    }
}

/// Where each known column sits in a loaded header.
/// Files written by other tools may reorder them.
#[derive(Clone, Debug)]
pub struct ColumnMap {
    positions: [Option<usize>; HEADERS.len()],
}

impl ColumnMap {
    pub fn from_header(header: &[String]) -> Self {
        let mut positions = [None; HEADERS.len()];
        for (slot, name) in HEADERS.iter().enumerate() {
            positions[slot] = header.iter().position(|h| h.trim() == *name);
        }
        Self { positions }
    }

    /// The row's cells rearranged into `HEADERS` order, text untouched.
    /// Missing columns and short rows give empty cells; unknown columns are dropped.
    pub fn project(&self, row: &[String]) -> Vec<String> {
        self.positions
            .iter()
            .map(|pos| pos.and_then(|i| row.get(i)).cloned().unwrap_or_default())
            .collect()
    }
}

pub fn price_value(cell: Option<&str>) -> f64 {
    cell.and_then(|c| c.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

fn bool_cell(b: bool) -> String {
    s!(if b { "True" } else { "False" })
}

/// Integer cell. Float spellings of whole numbers ("3.0") are accepted,
/// since other writers emit nullable integer columns that way.
fn parse_int_cell<T: TryFrom<i64>>(cell: &str) -> Option<T> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    let whole = cell.parse::<i64>().ok().or_else(|| {
        cell.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15)
            .map(|f| f as i64)
    });
    let value = whole.and_then(|v| T::try_from(v).ok());
    if value.is_none() {
        logd!("Cell '{cell}' is not an integer; kept as text only");
    }
    value
}

fn parse_bool_cell(cell: &str) -> Option<bool> {
    match cell.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn non_empty(cell: &str) -> Option<String> {
    let cell = cell.trim();
    if cell.is_empty() { None } else { Some(s!(cell)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> Vec<String> {
        HEADERS.iter().map(|h| s!(*h)).collect()
    }

    #[test]
    fn row_has_one_cell_per_header() {
        assert_eq!(Record::default().to_row().len(), HEADERS.len());
    }

    #[test]
    fn absent_values_serialize_as_empty_cells() {
        let r = Record { id: s!("X"), row: Some(0), ..Default::default() };
        let row = r.to_row();
        assert!(row.iter().enumerate().all(|(i, c)| i <= 1 || c.is_empty()));
        assert_eq!(row[0], "0");
        assert_eq!(row[1], "X");
    }

    #[test]
    fn full_record_survives_the_table() {
        let r = Record {
            row: Some(7),
            id: s!("118364"),
            name: s!("Pelé"),
            rating: Some(98),
            positions: Positions::new("CAM", &[s!("CF"), s!(""), s!("ST")]),
            concept: Some(false),
            price: Some(s!("150")),
            source_price: Some(s!("150")),
            max_chem: Some(FULL_CHEM),
            team_chem: Chem { calculation_type: s!("futgg"), contribution: Some(1), parameter_id: s!("112658") },
            ..Default::default()
        };
        let back = Record::from_cells(&ColumnMap::from_header(&header()).project(&r.to_row()));
        assert_eq!(back, r);
        assert_eq!(r.to_row()[15], "CAM|CF|ST");
        assert_eq!(r.to_row()[18], "False");
    }

    #[test]
    fn reordered_and_short_rows_are_read_by_name() {
        let header = row!["price", "id", "name"];
        let cells = ColumnMap::from_header(&header).project(&row!["250"]);
        assert_eq!(cells.len(), HEADERS.len());
        assert_eq!(cells[PRICE_CELL], "250");
        let r = Record::from_cells(&cells);
        assert_eq!(r.price.as_deref(), Some("250"));
        assert_eq!(r.id, "");
        assert!(!r.is_mappable());
    }

    #[test]
    fn price_cells_sit_where_the_header_says() {
        assert_eq!(HEADERS[PRICE_CELL], "price");
        assert_eq!(HEADERS[SOURCE_PRICE_CELL], "futggPrice");
    }

    #[test]
    fn foreign_spellings_read_into_typed_fields() {
        let mut cells = vec![s!(); HEADERS.len()];
        cells[0] = s!("4.0");
        cells[1] = s!(" 118364 ");
        cells[6] = s!("98.0");
        cells[18] = s!("1");
        cells[21] = s!("3.0");
        cells[24] = s!("1.0");
        cells[27] = s!("2.5");
        let r = Record::from_cells(&cells);
        assert_eq!(r.row, Some(4));
        assert_eq!(r.id, "118364");
        assert_eq!(r.rating, Some(98));
        assert_eq!(r.concept, Some(true));
        assert_eq!(r.max_chem, Some(FULL_CHEM));
        assert_eq!(r.team_chem.contribution, Some(1));
        assert_eq!(r.league_chem.contribution, None);
    }

    #[test]
    fn price_value_treats_junk_as_zero() {
        assert_eq!(price_value(None), 0.0);
        assert_eq!(price_value(Some("")), 0.0);
        assert_eq!(price_value(Some("n/a")), 0.0);
        assert_eq!(price_value(Some(" 1500 ")), 1500.0);
    }

    #[test]
    fn set_price_keeps_both_cells_in_sync() {
        let mut r = Record::default();
        r.set_price(Some(s!("900")));
        assert_eq!(r.price, r.source_price);
        r.set_price(None);
        assert!(r.price.is_none() && r.source_price.is_none());
    }
}
