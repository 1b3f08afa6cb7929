// Form state - one raw text value per logical field of the blend sheet
use super::blend::{BlendPayload, BlendRecord, RowEntry, MILL_COUNT, ROW_COUNT};
use std::fmt;
use std::str::FromStr;

/// A logical field on the blend sheet. Rows are 1-based, mills 0-based,
/// matching the page markup (`coalName1`, `data-mill="0"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    CoalName(usize),
    Percentage { row: usize, mill: usize },
    Gcv(usize),
    Cost(usize),
    Flow(usize),
    Generation,
}

impl FieldKey {
    /// Every field of the sheet, in page order.
    pub fn all() -> Vec<FieldKey> {
        let mut keys = Vec::new();
        for row in 1..=ROW_COUNT {
            keys.push(FieldKey::CoalName(row));
            for mill in 0..MILL_COUNT {
                keys.push(FieldKey::Percentage { row, mill });
            }
            keys.push(FieldKey::Gcv(row));
            keys.push(FieldKey::Cost(row));
        }
        for mill in 0..MILL_COUNT {
            keys.push(FieldKey::Flow(mill));
        }
        keys.push(FieldKey::Generation);
        keys
    }

    fn in_range(self) -> bool {
        let row_ok = |row: usize| (1..=ROW_COUNT).contains(&row);
        let mill_ok = |mill: usize| mill < MILL_COUNT;
        match self {
            FieldKey::CoalName(row) | FieldKey::Gcv(row) | FieldKey::Cost(row) => row_ok(row),
            FieldKey::Percentage { row, mill } => row_ok(row) && mill_ok(mill),
            FieldKey::Flow(mill) => mill_ok(mill),
            FieldKey::Generation => true,
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::CoalName(row) => write!(f, "coalName{}", row),
            FieldKey::Percentage { row, mill } => write!(f, "percentage.{}.{}", row, mill),
            FieldKey::Gcv(row) => write!(f, "gcvBox{}", row),
            FieldKey::Cost(row) => write!(f, "costBox{}", row),
            FieldKey::Flow(mill) => write!(f, "flow.{}", mill),
            FieldKey::Generation => write!(f, "generation"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field `{0}`")]
pub struct UnknownField(pub String);

impl FromStr for FieldKey {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownField(s.to_string());
        let index = |digits: &str| digits.parse::<usize>().map_err(|_| unknown());

        let key = if s == "generation" {
            FieldKey::Generation
        } else if let Some(row) = s.strip_prefix("coalName") {
            FieldKey::CoalName(index(row)?)
        } else if let Some(row) = s.strip_prefix("gcvBox") {
            FieldKey::Gcv(index(row)?)
        } else if let Some(row) = s.strip_prefix("costBox") {
            FieldKey::Cost(index(row)?)
        } else if let Some(mill) = s.strip_prefix("flow.") {
            FieldKey::Flow(index(mill)?)
        } else if let Some(rest) = s.strip_prefix("percentage.") {
            let (row, mill) = rest.split_once('.').ok_or_else(unknown)?;
            FieldKey::Percentage {
                row: index(row)?,
                mill: index(mill)?,
            }
        } else {
            return Err(unknown());
        };

        if key.in_range() { Ok(key) } else { Err(unknown()) }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct RowFields {
    coal: String,
    percentages: [String; MILL_COUNT],
    gcv: String,
    cost: String,
}

/// Text held by every field of the blend sheet. Each logical field has
/// exactly one owner here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    rows: [RowFields; ROW_COUNT],
    flows: [String; MILL_COUNT],
    generation: String,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.slot(key).map(String::as_str)
    }

    /// Set a field's text. Returns false for keys outside the sheet.
    pub fn set(&mut self, key: FieldKey, value: impl Into<String>) -> bool {
        match self.slot_mut(key) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    fn slot(&self, key: FieldKey) -> Option<&String> {
        match key {
            FieldKey::CoalName(row) => self.row(row).map(|r| &r.coal),
            FieldKey::Percentage { row, mill } => {
                self.row(row).and_then(|r| r.percentages.get(mill))
            }
            FieldKey::Gcv(row) => self.row(row).map(|r| &r.gcv),
            FieldKey::Cost(row) => self.row(row).map(|r| &r.cost),
            FieldKey::Flow(mill) => self.flows.get(mill),
            FieldKey::Generation => Some(&self.generation),
        }
    }

    fn slot_mut(&mut self, key: FieldKey) -> Option<&mut String> {
        match key {
            FieldKey::CoalName(row) => self.row_mut(row).map(|r| &mut r.coal),
            FieldKey::Percentage { row, mill } => {
                self.row_mut(row).and_then(|r| r.percentages.get_mut(mill))
            }
            FieldKey::Gcv(row) => self.row_mut(row).map(|r| &mut r.gcv),
            FieldKey::Cost(row) => self.row_mut(row).map(|r| &mut r.cost),
            FieldKey::Flow(mill) => self.flows.get_mut(mill),
            FieldKey::Generation => Some(&mut self.generation),
        }
    }

    fn row(&self, row: usize) -> Option<&RowFields> {
        row.checked_sub(1).and_then(|i| self.rows.get(i))
    }

    fn row_mut(&mut self, row: usize) -> Option<&mut RowFields> {
        row.checked_sub(1).and_then(|i| self.rows.get_mut(i))
    }

    /// Write a loaded blend into the sheet. Rows and mills past the sheet's
    /// fixed size are dropped; fields the record doesn't mention keep their
    /// current text. Gaps in the record show as empty fields.
    pub fn populate(&mut self, record: &BlendRecord) {
        for (row_idx, row) in record.rows.iter().take(ROW_COUNT).enumerate() {
            let r = row_idx + 1;
            self.set(FieldKey::CoalName(r), row.coal.clone());
            for (mill, pct) in row.percentages.iter().take(MILL_COUNT).enumerate() {
                self.set(FieldKey::Percentage { row: r, mill }, format_plain(*pct));
            }
            self.set(FieldKey::Gcv(r), format_fixed2(row.gcv));
            self.set(FieldKey::Cost(r), format_fixed2(row.cost));
        }

        for (mill, flow) in record.flows.iter().take(MILL_COUNT).enumerate() {
            self.set(FieldKey::Flow(mill), format_plain(*flow));
        }

        self.set(FieldKey::Generation, format_plain(record.generation));
    }

    /// Read the whole sheet back into a payload for the server.
    pub fn to_payload(&self) -> BlendPayload {
        let rows = self
            .rows
            .iter()
            .map(|r| RowEntry {
                coal: r.coal.trim().to_string(),
                percentages: r.percentages.iter().map(|p| Some(parse_lenient(p))).collect(),
                gcv: Some(parse_lenient(&r.gcv)),
                cost: Some(parse_lenient(&r.cost)),
            })
            .collect();

        BlendPayload {
            rows,
            flows: self.flows.iter().map(|f| Some(parse_lenient(f))).collect(),
            generation: Some(parse_lenient(&self.generation)),
        }
    }
}

/// Render a value with two decimals, or empty when absent or not finite.
pub fn format_fixed2(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}", v),
        _ => String::new(),
    }
}

/// Render a value as typed (`10`, `12.5`), or empty when absent or not finite.
pub fn format_plain(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => v.to_string(),
        _ => String::new(),
    }
}

/// Parse the longest numeric prefix of a field, the way a browser's
/// `parseFloat` does. Anything unparseable reads as zero.
pub fn parse_lenient(raw: &str) -> f64 {
    let text = raw.trim();
    let mut end = text.len();
    while end > 0 {
        if text.is_char_boundary(end) {
            if let Ok(v) = text[..end].parse::<f64>() {
                if v.is_finite() {
                    return v;
                }
            }
        }
        end -= 1;
    }
    0.0
}

/// One on-page copy of a logical field. A page may carry several copies of
/// the same field (for example one per tab).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCandidate {
    pub value: String,
    pub visible: bool,
    pub in_active_panel: bool,
}

/// Pick the copy that represents a field: the first one inside the active
/// panel, else the first visible one, else the first in document order.
pub fn pick_candidate(candidates: &[FieldCandidate]) -> Option<&FieldCandidate> {
    candidates
        .iter()
        .find(|c| c.in_active_panel)
        .or_else(|| candidates.iter().find(|c| c.visible))
        .or_else(|| candidates.first())
}
