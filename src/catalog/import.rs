use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::models::{Game, StreamingOffer, StreamingPackage};

use super::store::Catalog;

/// Per-file import counters, reported after every load and surfaced by the
/// admin import endpoint.
#[derive(Debug, Default, Clone, Copy, serde::Serialize)]
pub struct ImportStats {
    pub games: usize,
    pub packages: usize,
    pub offers: usize,
    pub skipped_rows: usize,
}

// Raw CSV rows are read as strings first; prices, flags and timestamps in
// the source files come in several formats and get normalized below.
#[derive(Debug, Deserialize)]
struct GameRow {
    id: String,
    team_home: String,
    team_away: String,
    starts_at: String,
    tournament_name: String,
}

#[derive(Debug, Deserialize)]
struct PackageRow {
    id: String,
    name: String,
    #[serde(default)]
    monthly_price_cents: String,
    #[serde(default)]
    monthly_price_yearly_subscription_in_cents: String,
}

#[derive(Debug, Deserialize)]
struct OfferRow {
    game_id: String,
    streaming_package_id: String,
    live: String,
    highlights: String,
}

/// Load games.csv, packages.csv and offers.csv from `data_dir` into a fresh
/// catalog. A missing or unreadable file is fatal; an invalid row is skipped
/// with a warning and counted in the stats.
pub fn load_catalog(data_dir: &Path) -> Result<(Catalog, ImportStats)> {
    let mut stats = ImportStats::default();

    let games = load_games(&data_dir.join("games.csv"), &mut stats)?;
    let packages = load_packages(&data_dir.join("packages.csv"), &mut stats)?;
    let offers = load_offers(&data_dir.join("offers.csv"), &mut stats, &games, &packages)?;

    stats.games = games.len();
    stats.packages = packages.len();
    stats.offers = offers.len();

    Ok((Catalog::from_parts(games, packages, offers), stats))
}

fn load_games(path: &Path, stats: &mut ImportStats) -> Result<Vec<Game>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open games file: {}", path.display()))?;

    let mut games = Vec::new();
    for (line, row) in reader.deserialize::<GameRow>().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!("games.csv line {}: unreadable row: {}", line + 2, e);
                stats.skipped_rows += 1;
                continue;
            }
        };

        let id = match row.id.parse::<u32>() {
            Ok(id) => id,
            Err(_) => {
                tracing::warn!("games.csv line {}: invalid id '{}'", line + 2, row.id);
                stats.skipped_rows += 1;
                continue;
            }
        };
        let starts_at = match parse_datetime(&row.starts_at) {
            Some(ts) => ts,
            None => {
                tracing::warn!(
                    "games.csv line {}: invalid starts_at '{}'",
                    line + 2,
                    row.starts_at
                );
                stats.skipped_rows += 1;
                continue;
            }
        };
        if row.team_home.is_empty() || row.team_away.is_empty() {
            tracing::warn!("games.csv line {}: missing team name", line + 2);
            stats.skipped_rows += 1;
            continue;
        }

        games.push(Game {
            id,
            team_home: row.team_home,
            team_away: row.team_away,
            starts_at,
            tournament_name: row.tournament_name,
        });
    }
    Ok(games)
}

fn load_packages(path: &Path, stats: &mut ImportStats) -> Result<Vec<StreamingPackage>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open packages file: {}", path.display()))?;

    let mut packages = Vec::new();
    for (line, row) in reader.deserialize::<PackageRow>().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!("packages.csv line {}: unreadable row: {}", line + 2, e);
                stats.skipped_rows += 1;
                continue;
            }
        };

        let id = match row.id.parse::<u32>() {
            Ok(id) => id,
            Err(_) => {
                tracing::warn!("packages.csv line {}: invalid id '{}'", line + 2, row.id);
                stats.skipped_rows += 1;
                continue;
            }
        };
        if row.name.is_empty() {
            tracing::warn!("packages.csv line {}: missing name", line + 2);
            stats.skipped_rows += 1;
            continue;
        }

        packages.push(StreamingPackage {
            id,
            name: row.name,
            monthly_price_cents: parse_price_cents(&row.monthly_price_cents),
            monthly_price_yearly_subscription_in_cents: parse_price_cents(
                &row.monthly_price_yearly_subscription_in_cents,
            ),
        });
    }
    Ok(packages)
}

fn load_offers(
    path: &Path,
    stats: &mut ImportStats,
    games: &[Game],
    packages: &[StreamingPackage],
) -> Result<Vec<StreamingOffer>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open offers file: {}", path.display()))?;

    let game_ids: std::collections::HashSet<u32> = games.iter().map(|g| g.id).collect();
    let package_ids: std::collections::HashSet<u32> = packages.iter().map(|p| p.id).collect();

    let mut offers = Vec::new();
    for (line, row) in reader.deserialize::<OfferRow>().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!("offers.csv line {}: unreadable row: {}", line + 2, e);
                stats.skipped_rows += 1;
                continue;
            }
        };

        let (game_id, package_id) = match (
            row.game_id.parse::<u32>(),
            row.streaming_package_id.parse::<u32>(),
        ) {
            (Ok(g), Ok(p)) => (g, p),
            _ => {
                tracing::warn!(
                    "offers.csv line {}: invalid ids '{}'/'{}'",
                    line + 2,
                    row.game_id,
                    row.streaming_package_id
                );
                stats.skipped_rows += 1;
                continue;
            }
        };
        // Referential integrity: an offer pointing at an unknown game or
        // package can never be reached by a request.
        if !game_ids.contains(&game_id) || !package_ids.contains(&package_id) {
            tracing::warn!(
                "offers.csv line {}: dangling reference game={} package={}",
                line + 2,
                game_id,
                package_id
            );
            stats.skipped_rows += 1;
            continue;
        }

        offers.push(StreamingOffer {
            game_id,
            streaming_package_id: package_id,
            live: parse_flag(&row.live),
            highlights: parse_flag(&row.highlights),
        });
    }
    Ok(offers)
}

/// Accepted timestamp formats, in the order the source data has used them.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%d.%m.%Y %H:%M"];

fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// Normalize a price cell to integer cents.
///
/// Plain integers are taken as cents verbatim ("999" -> 999). Decorated or
/// decimal values are euro amounts: "10,50" -> 1050, "€10.99" -> 1099,
/// "1.000,00" -> 100000, "10,99 EUR" -> 1099. Blank or unparseable -> None
/// (package not sold at that tier).
pub fn parse_price_cents(raw: &str) -> Option<u32> {
    let mut value: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '€' && *c != '$')
        .collect();
    let lower = value.to_ascii_lowercase();
    if let Some(stripped) = lower.strip_suffix("eur") {
        value.truncate(stripped.len());
    }
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    // No separator at all: already integer cents.
    if !value.contains('.') && !value.contains(',') {
        return value.parse().ok();
    }

    // Decimal euro amount, European or US separator convention.
    let normalized = match (value.find('.'), value.find(',')) {
        (Some(dot), Some(comma)) if dot < comma => {
            value.replace('.', "").replace(',', ".")
        }
        (Some(_), Some(_)) => value.replace(',', ""),
        (None, Some(_)) => value.replace(',', "."),
        _ => value.to_string(),
    };

    let (whole, frac) = match normalized.split_once('.') {
        Some((w, f)) => (w, f),
        None => (normalized.as_str(), ""),
    };
    let whole: u32 = whole.parse().ok()?;
    let frac = if frac.len() > 2 { &frac[..2] } else { frac };
    let cents = match frac.len() {
        0 => 0,
        1 => frac.parse::<u32>().ok()? * 10,
        _ => frac.parse::<u32>().ok()?,
    };
    whole.checked_mul(100)?.checked_add(cents)
}

/// Flag cells accept 1/true/yes/y/t in any case; everything else is false.
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "t"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn price_parsing_handles_source_formats() {
        assert_eq!(parse_price_cents("999"), Some(999));
        assert_eq!(parse_price_cents("0"), Some(0));
        assert_eq!(parse_price_cents("10,50"), Some(1050));
        assert_eq!(parse_price_cents("10.50"), Some(1050));
        assert_eq!(parse_price_cents("€10.99"), Some(1099));
        assert_eq!(parse_price_cents("1.000,00"), Some(100000));
        assert_eq!(parse_price_cents("1,000.00"), Some(100000));
        assert_eq!(parse_price_cents("10,99 EUR"), Some(1099));
        assert_eq!(parse_price_cents("12.5"), Some(1250));
        assert_eq!(parse_price_cents(""), None);
        assert_eq!(parse_price_cents("   "), None);
        assert_eq!(parse_price_cents("n/a"), None);
    }

    #[test]
    fn flag_parsing_is_lenient() {
        for truthy in ["1", "true", "TRUE", "Yes", "y", "t"] {
            assert!(parse_flag(truthy), "{truthy} should be true");
        }
        for falsy in ["0", "false", "no", "", "2"] {
            assert!(!parse_flag(falsy), "{falsy} should be false");
        }
    }

    #[test]
    fn datetime_parsing_accepts_known_formats() {
        assert!(parse_datetime("2024-06-14 19:00:00").is_some());
        assert!(parse_datetime("2024-06-14 19:00").is_some());
        assert!(parse_datetime("14.06.2024 19:00").is_some());
        assert!(parse_datetime("2024-06-14T19:00:00Z").is_some());
        assert!(parse_datetime("not a date").is_none());
    }

    #[test]
    fn importer_skips_bad_rows_and_keeps_good_ones() {
        let dir = std::env::temp_dir().join("streamscout_import_test");
        fs::create_dir_all(&dir).unwrap();

        fs::write(
            dir.join("games.csv"),
            "id,team_home,team_away,starts_at,tournament_name\n\
             1,Bayern,Dortmund,2024-06-14 19:00:00,Bundesliga\n\
             oops,Bayern,Leipzig,2024-06-15 19:00:00,Bundesliga\n\
             3,Leipzig,Bayern,bad-date,Bundesliga\n",
        )
        .unwrap();
        fs::write(
            dir.join("packages.csv"),
            "id,name,monthly_price_cents,monthly_price_yearly_subscription_in_cents\n\
             10,Sky Sport,2999,2499\n\
             11,Free TV,,\n",
        )
        .unwrap();
        fs::write(
            dir.join("offers.csv"),
            "game_id,streaming_package_id,live,highlights\n\
             1,10,1,1\n\
             1,11,0,true\n\
             999,10,1,0\n",
        )
        .unwrap();

        let (catalog, stats) = load_catalog(&dir).unwrap();

        assert_eq!(stats.games, 1);
        assert_eq!(stats.packages, 2);
        assert_eq!(stats.offers, 2);
        assert_eq!(stats.skipped_rows, 3);

        assert!(catalog.offer(1, 10).unwrap().live);
        let free = catalog.offer(1, 11).unwrap();
        assert!(!free.live);
        assert!(free.highlights);
        assert_eq!(catalog.package(11).unwrap().monthly_price_cents, None);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = std::env::temp_dir().join("streamscout_missing_dir");
        fs::remove_dir_all(&dir).ok();
        assert!(load_catalog(&dir).is_err());
    }
}
