//! ドメイン型（Newtype）
//!
//! String / PathBufを直接運ばず、意味のある型に包んで境界を明確にする。
//! 予測レコード（Prediction）はベンダーのレスポンススキーマと
//! 履歴ファイルの両方で同じcamelCase表現を使う。

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// ホームディレクトリのパス
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeDir(PathBuf);

impl HomeDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }
}

impl std::ops::Deref for HomeDir {
    type Target = PathBuf;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for HomeDir {
    fn as_ref(&self) -> &Path {
        self.0.as_ref()
    }
}

impl From<PathBuf> for HomeDir {
    fn from(p: PathBuf) -> Self {
        Self(p)
    }
}

/// プロバイダ名（openai, mock 等）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderName(String);

impl ProviderName {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl std::ops::Deref for ProviderName {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ProviderName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ProviderName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for ProviderName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// モデル名（gpt-4o 等）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelName(String);

impl ModelName {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl std::ops::Deref for ModelName {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ModelName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ModelName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for ModelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// 予測ID（8文字base62、辞書順＝時系列）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionId(String);

impl PredictionId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::ops::Deref for PredictionId {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for PredictionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for PredictionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for PredictionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// --- 予測レコード -----------------------------------------------------------

/// 品種の詳細情報
///
/// origin / type / characteristics / primaryUse はスキーマ上必須。
/// averageWeight / milkYield は任意。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreedInfo {
    pub origin: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub characteristics: String,
    pub primary_use: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milk_yield: Option<String>,
}

/// 次点候補（ベンダー出力の並びは未規定。表示側で信頼度降順に並べ替える）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativePossibility {
    pub breed_name: String,
    pub confidence: f64,
}

/// 品種予測レコード
///
/// ベンダーから返る部分（breedName〜alternativePossibilities）に、
/// ローカルで生成するid / timestampを加えたもの。
/// image_pathは現在のプロセスでのみ有効な一時参照で、履歴には永続化しない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    #[serde(default)]
    pub id: PredictionId,
    pub breed_name: String,
    /// 信頼度（0〜1。ベンダーに送るスキーマで強制される）
    pub confidence: f64,
    pub breed_info: BreedInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_possibilities: Option<Vec<AlternativePossibility>>,
    /// 作成時刻（Unix epochミリ秒）
    #[serde(default)]
    pub timestamp: u64,
    #[serde(skip)]
    pub image_path: Option<PathBuf>,
}

/// 追加分析のフォーカス
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisFocus {
    /// 品種の特徴（自由記述）
    Breed,
    /// 健康状態の所見
    Health,
    /// ボディコンディション評価
    Condition,
}

impl AnalysisFocus {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "breed" => Some(Self::Breed),
            "health" => Some(Self::Health),
            "condition" => Some(Self::Condition),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Breed => "breed",
            Self::Health => "health",
            Self::Condition => "condition",
        }
    }
}

/// 画像参照
///
/// ローカルファイルかリモートURLかをタグ付きで区別し、
/// トランスポート表現（data URL / URLそのまま）への変換は1か所で行う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    LocalFile(PathBuf),
    RemoteUrl(String),
}

impl ImageRef {
    /// CLI引数からの解釈。http(s)スキームならRemoteUrl、それ以外はLocalFile
    pub fn parse(arg: &str) -> Self {
        if arg.starts_with("http://") || arg.starts_with("https://") {
            Self::RemoteUrl(arg.to_string())
        } else {
            Self::LocalFile(PathBuf::from(arg))
        }
    }

    pub fn local_path(&self) -> Option<&Path> {
        match self {
            Self::LocalFile(p) => Some(p.as_path()),
            Self::RemoteUrl(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_id_default_is_empty() {
        let id = PredictionId::default();
        assert!(id.is_empty());
    }

    #[test]
    fn test_analysis_focus_from_str() {
        assert_eq!(AnalysisFocus::from_str("breed"), Some(AnalysisFocus::Breed));
        assert_eq!(AnalysisFocus::from_str("Health"), Some(AnalysisFocus::Health));
        assert_eq!(
            AnalysisFocus::from_str("CONDITION"),
            Some(AnalysisFocus::Condition)
        );
        assert_eq!(AnalysisFocus::from_str("weight"), None);
    }

    #[test]
    fn test_image_ref_parse() {
        assert_eq!(
            ImageRef::parse("https://example.com/cow.jpg"),
            ImageRef::RemoteUrl("https://example.com/cow.jpg".to_string())
        );
        assert_eq!(
            ImageRef::parse("photos/cow.jpg"),
            ImageRef::LocalFile(PathBuf::from("photos/cow.jpg"))
        );
    }

    #[test]
    fn test_prediction_deserialize_vendor_shape() {
        // ベンダーが返す形（id / timestampなし）をそのまま読めること
        let json = r#"{
            "breedName": "Gir",
            "confidence": 0.92,
            "breedInfo": {
                "origin": "Gujarat, India",
                "type": "Dairy Cattle",
                "characteristics": "Domed forehead, long pendulous ears.",
                "primaryUse": "Milk production"
            },
            "analysisNotes": "Distinctive domed forehead visible."
        }"#;
        let p: Prediction = serde_json::from_str(json).unwrap();
        assert_eq!(p.breed_name, "Gir");
        assert_eq!(p.confidence, 0.92);
        assert_eq!(p.breed_info.origin, "Gujarat, India");
        assert_eq!(p.breed_info.type_, "Dairy Cattle");
        assert!(p.id.is_empty());
        assert_eq!(p.timestamp, 0);
        assert!(p.image_path.is_none());
    }

    #[test]
    fn test_prediction_roundtrip_keeps_camel_case() {
        let p = Prediction {
            id: PredictionId::new("0000AbCd"),
            breed_name: "Murrah Buffalo".to_string(),
            confidence: 0.95,
            breed_info: BreedInfo {
                origin: "Haryana, India".to_string(),
                type_: "Water Buffalo".to_string(),
                characteristics: "Jet black with tightly curled horns.".to_string(),
                primary_use: "Milk production".to_string(),
                average_weight: Some("450-550 kg".to_string()),
                milk_yield: None,
            },
            analysis_notes: None,
            alternative_possibilities: Some(vec![AlternativePossibility {
                breed_name: "Nili-Ravi Buffalo".to_string(),
                confidence: 0.4,
            }]),
            timestamp: 1_700_000_000_000,
            image_path: Some(PathBuf::from("/tmp/buffalo.jpg")),
        };
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"breedName\":\"Murrah Buffalo\""));
        assert!(json.contains("\"primaryUse\""));
        assert!(json.contains("\"averageWeight\""));
        // image_pathは永続化しない
        assert!(!json.contains("image_path"));
        assert!(!json.contains("imagePath"));

        let back: Prediction = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, p.id);
        assert_eq!(back.breed_info.average_weight, p.breed_info.average_weight);
        // 一時参照は復元されない
        assert!(back.image_path.is_none());
    }
}
