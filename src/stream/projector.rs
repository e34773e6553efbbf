// ABOUTME: Chart-ready projection of per-language line counts plus derived fun metrics.
// ABOUTME: Pure functions; the same input always yields the same ordered output.

use std::collections::BTreeMap;

/// Extensions that never appear in the language chart.
pub const EXCLUDED_EXTENSIONS: [&str; 5] = [".log", ".gitignore", ".gitattributes", ".png", ".jpg"];

/// Maximum number of languages shown.
pub const TOP_LANGUAGES: usize = 10;

const CHARS_PER_LINE: u64 = 60;
const CHARS_PER_WORD: u64 = 5;
const LINES_PER_HAMLET: u64 = 884_647;
const LINES_PER_NOVEL: u64 = 50_000;
const LINES_PER_HARRY_POTTER_SERIES: u64 = 1_090_736;

/// One bar in the language chart.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageLines {
    pub language: String,
    pub lines: u64,
    /// Share of the charted total, in percent.
    pub share: f64,
}

/// Filter, normalize, rank, and cap the per-language counts.
pub fn project(lines_per_language: &BTreeMap<String, u64>) -> Vec<LanguageLines> {
    let mut entries: Vec<(String, u64)> = lines_per_language
        .iter()
        .filter(|(ext, _)| !EXCLUDED_EXTENSIONS.contains(&ext.as_str()))
        .map(|(ext, lines)| {
            let language = ext.strip_prefix('.').unwrap_or(ext.as_str()).to_string();
            (language, *lines)
        })
        .collect();

    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(TOP_LANGUAGES);

    // Summed as f64 so very large counts cannot overflow.
    let charted: f64 = entries.iter().map(|(_, lines)| *lines as f64).sum();
    entries
        .into_iter()
        .map(|(language, lines)| LanguageLines {
            language,
            lines,
            share: if charted == 0.0 {
                0.0
            } else {
                lines as f64 / charted * 100.0
            },
        })
        .collect()
}

/// Playful equivalents of a line count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DerivedMetrics {
    pub total_lines: u64,
    pub characters: u64,
    pub words: u64,
    pub hamlets: u64,
    pub novels: u64,
    pub harry_potter_series: u64,
}

impl DerivedMetrics {
    pub fn from_lines(total_lines: u64) -> Self {
        let characters = total_lines.saturating_mul(CHARS_PER_LINE);
        Self {
            total_lines,
            characters,
            words: characters / CHARS_PER_WORD,
            hamlets: round_div(total_lines, LINES_PER_HAMLET),
            novels: round_div(total_lines, LINES_PER_NOVEL),
            harry_potter_series: round_div(total_lines, LINES_PER_HARRY_POTTER_SERIES),
        }
    }
}

/// Integer division rounding halves up.
fn round_div(n: u64, d: u64) -> u64 {
    n / d + u64::from(n % d >= d.div_ceil(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, u64)]) -> BTreeMap<String, u64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn strips_leading_dot_and_sorts_descending() {
        let out = project(&counts(&[(".css", 2345), (".ts", 10000)]));
        let names: Vec<&str> = out.iter().map(|l| l.language.as_str()).collect();
        assert_eq!(names, vec!["ts", "css"]);
        assert_eq!(out[0].lines, 10000);
    }

    #[test]
    fn excluded_extensions_never_appear() {
        let out = project(&counts(&[
            (".log", 999_999),
            (".png", 5),
            (".jpg", 5),
            (".gitignore", 3),
            (".gitattributes", 2),
            (".rs", 10),
        ]));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].language, "rs");
    }

    #[test]
    fn keeps_at_most_ten() {
        let map: BTreeMap<String, u64> = (0..25).map(|i| (format!(".x{}", i), i as u64)).collect();
        let out = project(&map);
        assert_eq!(out.len(), TOP_LANGUAGES);
        assert_eq!(out[0].lines, 24);
        assert_eq!(out[9].lines, 15);
    }

    #[test]
    fn ties_break_by_name() {
        let out = project(&counts(&[(".py", 5), (".go", 5), (".c", 5)]));
        let names: Vec<&str> = out.iter().map(|l| l.language.as_str()).collect();
        assert_eq!(names, vec!["c", "go", "py"]);
    }

    #[test]
    fn projection_is_deterministic() {
        let input = counts(&[(".ts", 40), (".js", 40), (".md", 3), (".log", 100)]);
        assert_eq!(project(&input), project(&input.clone()));
    }

    #[test]
    fn names_without_dot_pass_through() {
        let out = project(&counts(&[("Makefile", 12)]));
        assert_eq!(out[0].language, "Makefile");
    }

    #[test]
    fn shares_sum_to_hundred() {
        let out = project(&counts(&[(".ts", 10000), (".css", 2345)]));
        let total: f64 = out.iter().map(|l| l.share).sum();
        assert!((total - 100.0).abs() < 1e-9);
        assert!((out[0].share - 81.004_455_245).abs() < 1e-6);
    }

    #[test]
    fn empty_input_projects_nothing() {
        assert!(project(&BTreeMap::new()).is_empty());
        let zeros = project(&counts(&[(".rs", 0)]));
        assert_eq!(zeros[0].share, 0.0);
    }

    #[test]
    fn derived_metrics_for_scenario_total() {
        let m = DerivedMetrics::from_lines(12_345);
        assert_eq!(m.characters, 740_700);
        assert_eq!(m.words, 148_140);
        assert_eq!(m.hamlets, 0);
        assert_eq!(m.novels, 0);
        assert_eq!(m.harry_potter_series, 0);
    }

    #[test]
    fn derived_metrics_round_half_up() {
        assert_eq!(DerivedMetrics::from_lines(25_000).novels, 1);
        assert_eq!(DerivedMetrics::from_lines(24_999).novels, 0);
        assert_eq!(DerivedMetrics::from_lines(1_769_294).hamlets, 2);
        assert_eq!(DerivedMetrics::from_lines(1_090_736).harry_potter_series, 1);
    }

    #[test]
    fn metrics_saturate_instead_of_overflowing() {
        let m = DerivedMetrics::from_lines(u64::MAX);
        assert_eq!(m.characters, u64::MAX);
        assert_eq!(m.words, u64::MAX / 5);
        // u64::MAX = 368_934_881_474_191 * 50_000 + 1_615
        assert_eq!(m.novels, 368_934_881_474_191);
        assert!(m.hamlets > 0 && m.harry_potter_series > 0);
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(round_div(25_000, 50_000), 1);
        assert_eq!(round_div(24_999, 50_000), 0);
        assert_eq!(round_div(7, 5), 1);
        assert_eq!(round_div(8, 5), 2);
    }

    #[test]
    fn huge_language_counts_share_evenly() {
        let langs = project(&counts(&[(".rs", u64::MAX), (".go", u64::MAX)]));
        assert_eq!(langs.len(), 2);
        assert_eq!(langs[0].language, "go");
        assert_eq!(langs[0].share, 50.0);
        assert_eq!(langs[1].share, 50.0);
    }
}
