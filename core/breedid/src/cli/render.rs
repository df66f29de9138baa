//! 結果表示のレンダリング
//!
//! 表示文字列の組み立てだけを行い、printlnはmain側で行う。

use common::domain::{AlternativePossibility, Prediction};

/// 信頼度を整数パーセント表示にする（0.92 → "92%"）
pub fn confidence_percent(confidence: f64) -> String {
    format!("{}%", (confidence * 100.0).round() as i64)
}

fn format_timestamp(ms: u64) -> Option<String> {
    if ms == 0 {
        return None;
    }
    chrono::DateTime::from_timestamp_millis(ms as i64)
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
}

/// 次点候補を信頼度降順に並べ替えて返す
///
/// ベンダー出力の並びは未規定のため、表示前にここで揃える。
fn sorted_alternatives(alts: &[AlternativePossibility]) -> Vec<&AlternativePossibility> {
    let mut sorted: Vec<&AlternativePossibility> = alts.iter().collect();
    sorted.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    sorted
}

/// 予測1件の結果カード
pub fn render_prediction(p: &Prediction) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Breed: {} ({} confidence)\n",
        p.breed_name,
        confidence_percent(p.confidence)
    ));
    out.push_str(&format!("Origin: {}\n", p.breed_info.origin));
    out.push_str(&format!("Type: {}\n", p.breed_info.type_));
    out.push_str(&format!("Primary use: {}\n", p.breed_info.primary_use));
    if let Some(ref w) = p.breed_info.average_weight {
        out.push_str(&format!("Average weight: {}\n", w));
    }
    if let Some(ref y) = p.breed_info.milk_yield {
        out.push_str(&format!("Milk yield: {}\n", y));
    }
    out.push_str("Characteristics:\n");
    for line in p.breed_info.characteristics.lines() {
        out.push_str(&format!("  {}\n", line));
    }
    if let Some(ref notes) = p.analysis_notes {
        out.push_str(&format!("Notes: {}\n", notes));
    }
    if let Some(ref alts) = p.alternative_possibilities {
        if !alts.is_empty() {
            out.push_str("Alternative possibilities:\n");
            for alt in sorted_alternatives(alts) {
                out.push_str(&format!(
                    "  - {} ({})\n",
                    alt.breed_name,
                    confidence_percent(alt.confidence)
                ));
            }
        }
    }
    if let Some(ts) = format_timestamp(p.timestamp) {
        out.push_str(&format!("Identified: {}  [id: {}]\n", ts, p.id));
    }
    out
}

/// 履歴一覧（新しい順で渡される前提）
pub fn render_history(entries: &[Prediction]) -> String {
    let mut out = String::new();
    for (i, p) in entries.iter().enumerate() {
        let when = format_timestamp(p.timestamp).unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:>2}. {}  {}  {}  {}\n",
            i + 1,
            p.id,
            confidence_percent(p.confidence),
            when,
            p.breed_name
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::domain::{BreedInfo, PredictionId};

    fn gir() -> Prediction {
        Prediction {
            id: PredictionId::new("0000AbCd"),
            breed_name: "Gir".to_string(),
            confidence: 0.92,
            breed_info: BreedInfo {
                origin: "Gujarat, India".to_string(),
                type_: "Dairy Cattle".to_string(),
                characteristics: "Domed forehead.\nLong pendulous ears.".to_string(),
                primary_use: "Milk production".to_string(),
                average_weight: Some("385-400 kg".to_string()),
                milk_yield: Some("1,590 kg per lactation".to_string()),
            },
            analysis_notes: Some("Distinctive domed forehead visible.".to_string()),
            alternative_possibilities: Some(vec![
                AlternativePossibility {
                    breed_name: "Red Sindhi".to_string(),
                    confidence: 0.31,
                },
                AlternativePossibility {
                    breed_name: "Sahiwal".to_string(),
                    confidence: 0.44,
                },
            ]),
            timestamp: 1_756_000_000_000,
            image_path: None,
        }
    }

    #[test]
    fn test_confidence_percent() {
        assert_eq!(confidence_percent(0.92), "92%");
        assert_eq!(confidence_percent(0.0), "0%");
        assert_eq!(confidence_percent(1.0), "100%");
        assert_eq!(confidence_percent(0.876), "88%");
    }

    #[test]
    fn test_render_prediction_card() {
        let card = render_prediction(&gir());
        assert!(card.contains("Breed: Gir (92% confidence)"));
        assert!(card.contains("Origin: Gujarat, India"));
        assert!(card.contains("Average weight: 385-400 kg"));
        assert!(card.contains("Notes: Distinctive domed forehead visible."));
        assert!(card.contains("[id: 0000AbCd]"));
    }

    #[test]
    fn test_render_prediction_sorts_alternatives_by_confidence() {
        let card = render_prediction(&gir());
        let sahiwal = card.find("Sahiwal (44%)").unwrap();
        let sindhi = card.find("Red Sindhi (31%)").unwrap();
        assert!(sahiwal < sindhi);
    }

    #[test]
    fn test_render_prediction_omits_optional_fields() {
        let mut p = gir();
        p.breed_info.average_weight = None;
        p.breed_info.milk_yield = None;
        p.analysis_notes = None;
        p.alternative_possibilities = None;
        p.timestamp = 0;
        let card = render_prediction(&p);
        assert!(!card.contains("Average weight"));
        assert!(!card.contains("Milk yield"));
        assert!(!card.contains("Notes:"));
        assert!(!card.contains("Alternative possibilities"));
        assert!(!card.contains("Identified:"));
    }

    #[test]
    fn test_render_history_lines() {
        let mut second = gir();
        second.id = PredictionId::new("0000AbCe");
        second.breed_name = "Sahiwal".to_string();
        second.confidence = 0.87;
        let out = render_history(&[second, gir()]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(" 1. 0000AbCe"));
        assert!(lines[0].contains("Sahiwal"));
        assert!(lines[1].contains("Gir"));
    }
}
