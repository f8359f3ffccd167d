// src/specs/players.rs
//
// Raw player item (one entry of `playerItems.data`) → canonical Record.

use serde_json::Value;

use crate::record::{Chem, FULL_CHEM, Positions, Record};
use crate::refs::ReferenceSets;

/// Calculation-type tag written on every chemistry triple.
pub const CHEM_CALC_TYPE: &str = "futgg";

/// Map one raw item. Pure: no I/O, no store access.
///
/// With `refs` the concept flag is classified (club member ⇒ `false`);
/// without it the flag stays empty, as in the baseline store.
/// An item without id maps to a record that is not [`Record::is_mappable`].
pub fn map(raw: &Value, refs: Option<&ReferenceSets>) -> Record {
    let id = text(raw.get("id"));
    let asset_id = id_text(raw.get("basePlayerEaId"));
    let definition_id = id_text(raw.get("eaId"));

    let team_id = non_empty(id_text(raw.get("uniqueClubEaId")))
        .unwrap_or_else(|| id_text(raw.pointer("/club/eaId")));
    let league_id = id_text(raw.pointer("/league/eaId"));
    let nation_id = id_text(raw.pointer("/nation/eaId"));

    let alternates: Vec<String> = raw
        .get("alternativePositions")
        .and_then(Value::as_array)
        .map(|v| v.iter().map(|p| text(Some(p))).collect())
        .unwrap_or_default();
    let positions = Positions::new(&text(raw.get("position")), &alternates);

    let price = if raw.get("hasPrice").and_then(Value::as_bool) == Some(true) {
        non_empty(text(raw.get("price")))
    } else {
        None
    };

    let max_chem = (raw.get("isFullChemistry").and_then(Value::as_bool) == Some(true)).then_some(FULL_CHEM);

    let concept = refs.map(|r| !r.is_club(&id, &definition_id));

    Record {
        row: None,
        name: pick_name(raw),
        card_type: text(raw.get("rarityName")),
        rating: int(raw.get("overall")).or_else(|| text(raw.get("overall")).parse().ok()),
        rarity_id: text(raw.get("rarityEaId")),
        positions,
        concept,
        source_price: price.clone(),
        price,
        max_chem,
        normalize_club_id: team_id.clone(),
        team_chem: chem(raw.get("extraClubChemistry"), &team_id),
        league_chem: chem(raw.get("extraLeagueChemistry"), &league_id),
        nation_chem: chem(raw.get("extraNationChemistry"), &nation_id),
        id,
        asset_id,
        definition_id,
        team_id,
        league_id,
        nation_id,
        ..Default::default()
    }
}

/// commonName → "firstName lastName" → cardName → "". First non-empty wins.
fn pick_name(raw: &Value) -> String {
    let full = [raw.get("firstName"), raw.get("lastName")]
        .into_iter()
        .map(text)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    non_empty(text(raw.get("commonName")))
        .or_else(|| non_empty(full))
        .or_else(|| non_empty(text(raw.get("cardName"))))
        .unwrap_or_default()
}

fn chem(contribution: Option<&Value>, parameter_id: &str) -> Chem {
    Chem {
        calculation_type: s!(CHEM_CALC_TYPE),
        contribution: int(contribution),
        parameter_id: s!(parameter_id),
    }
}

/// Strict integer gate: floats, strings, bools and null are all rejected.
fn int(v: Option<&Value>) -> Option<i64> {
    match v {
        Some(Value::Number(n)) if n.is_i64() || n.is_u64() => n.as_i64(),
        _ => None,
    }
}

/// Scalar as trimmed text; null, missing and containers become "".
fn text(v: Option<&Value>) -> String {
    match v {
        Some(Value::String(s)) => s!(s.trim()),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => s!(if *b { "True" } else { "False" }),
        _ => s!(),
    }
}

/// Like `text`, but a zero id means "no id".
fn id_text(v: Option<&Value>) -> String {
    let t = text(v);
    if t == "0" { s!() } else { t }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}
