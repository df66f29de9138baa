//! モックプロバイダの実装
//!
//! このプロバイダは実際にビジョンAPIを呼び出さず、固定の品種データを
//! 順番に返します。デモやテスト用に使用します。
//! 実APIの待ち時間を模すため、リクエスト実行時に一度だけ短いスリープを入れる。

use crate::domain::AnalysisFocus;
use crate::error::Error;
use crate::vision::image::TransportImage;
use crate::vision::provider::VisionProvider;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

const MOCK_DELAY_MS: u64 = 200;

/// モックプロバイダ
#[derive(Debug)]
pub struct MockProvider {
    counter: AtomicUsize,
}

impl MockProvider {
    /// 新しいモックプロバイダを作成
    ///
    /// 呼び出しごとに固定データを先頭（Gir）から順番に返す。
    pub fn new() -> Self {
        Self {
            counter: AtomicUsize::new(0),
        }
    }

    fn canned_prediction(index: usize) -> Value {
        let breeds = [
            json!({
                "breedName": "Gir",
                "confidence": 0.92,
                "breedInfo": {
                    "origin": "Gujarat, India",
                    "type": "Dairy Cattle",
                    "characteristics": "The Gir breed is known for its distinctive appearance with a domed forehead, long pendulous ears, and a dewlap that extends from the chin to the navel.\nThey have a gentle temperament and are well-adapted to hot climates.",
                    "primaryUse": "Milk production and draught work",
                    "averageWeight": "385-400 kg",
                    "milkYield": "1,590 kg per lactation"
                },
                "analysisNotes": "Canned result for demos and tests; no image was analyzed.",
                "alternativePossibilities": [
                    { "breedName": "Red Sindhi", "confidence": 0.31 },
                    { "breedName": "Sahiwal", "confidence": 0.44 }
                ]
            }),
            json!({
                "breedName": "Sahiwal",
                "confidence": 0.87,
                "breedInfo": {
                    "origin": "Punjab, Pakistan/India",
                    "type": "Dairy Cattle",
                    "characteristics": "Sahiwal cattle are reddish brown in color with white markings on the face and legs.\nThey are known for their heat tolerance and good milk production capacity.",
                    "primaryUse": "Milk production",
                    "averageWeight": "300-400 kg",
                    "milkYield": "2,270 kg per lactation"
                },
                "analysisNotes": "Canned result for demos and tests; no image was analyzed."
            }),
            json!({
                "breedName": "Red Sindhi",
                "confidence": 0.78,
                "breedInfo": {
                    "origin": "Sindh, Pakistan",
                    "type": "Dairy Cattle",
                    "characteristics": "Red Sindhi cattle are deep red in color with white markings.\nThey are compact, well-built animals with good heat tolerance and disease resistance.",
                    "primaryUse": "Milk production",
                    "averageWeight": "300-350 kg",
                    "milkYield": "1,800 kg per lactation"
                },
                "analysisNotes": "Canned result for demos and tests; no image was analyzed."
            }),
            json!({
                "breedName": "Murrah Buffalo",
                "confidence": 0.95,
                "breedInfo": {
                    "origin": "Haryana, India",
                    "type": "Water Buffalo",
                    "characteristics": "Murrah buffaloes are jet black in color with tightly curled horns.\nThey are the best dairy buffalo breed in India with excellent milk production.",
                    "primaryUse": "Milk production",
                    "averageWeight": "450-550 kg",
                    "milkYield": "3,000-4,000 kg per lactation"
                },
                "analysisNotes": "Canned result for demos and tests; no image was analyzed."
            }),
        ];
        breeds[index % breeds.len()].clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl VisionProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn make_http_request(&self, request_json: &str) -> Result<String, Error> {
        // 実APIの待ち時間の模擬（モック経路で唯一のタイマー）
        thread::sleep(Duration::from_millis(MOCK_DELAY_MS));

        let v: Value = serde_json::from_str(request_json)
            .map_err(|e| Error::json(format!("Failed to parse request JSON: {}", e)))?;

        let index = self.counter.fetch_add(1, Ordering::SeqCst);
        let content = if v.get("response_format").is_some() {
            serde_json::to_string(&Self::canned_prediction(index))
                .map_err(|e| Error::json(e.to_string()))?
        } else {
            let focus = v["messages"][1]["content"][0]["text"]
                .as_str()
                .and_then(|t| t.rsplit(": ").next())
                .unwrap_or("breed")
                .to_string();
            format!(
                "Mock analysis (focus: {}). The animal appears healthy and in good body condition; no actual image analysis was performed.",
                focus
            )
        };

        let response = json!({
            "choices": [
                { "message": { "role": "assistant", "content": content } }
            ]
        });
        serde_json::to_string(&response).map_err(|e| Error::json(e.to_string()))
    }

    fn make_identify_payload(&self, image: &TransportImage) -> Result<Value, Error> {
        Ok(json!({
            "model": "mock",
            "messages": [
                { "role": "system", "content": "mock breed identification" },
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": "Please identify the cattle or buffalo breed in this image and provide detailed information about it." },
                        { "type": "image_url", "image_url": { "url": image.url() } }
                    ]
                }
            ],
            "response_format": { "type": "json_schema" }
        }))
    }

    fn make_analysis_payload(
        &self,
        image: &TransportImage,
        focus: AnalysisFocus,
    ) -> Result<Value, Error> {
        Ok(json!({
            "model": "mock",
            "messages": [
                { "role": "system", "content": "mock analysis" },
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": format!("Please analyze this image with focus on: {}", focus.as_str()) },
                        { "type": "image_url", "image_url": { "url": image.url() } }
                    ]
                }
            ],
            "max_tokens": 1000
        }))
    }

    fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error> {
        let v: Value = serde_json::from_str(response_json)
            .map_err(|e| Error::json(format!("Failed to parse response JSON: {}", e)))?;
        let text = v["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::StdFileSystem;
    use crate::domain::ImageRef;

    fn image() -> TransportImage {
        TransportImage::from_image_ref(
            &StdFileSystem,
            &ImageRef::RemoteUrl("https://example.com/cow.jpg".to_string()),
        )
        .unwrap()
    }

    #[test]
    fn test_first_identify_response_is_gir() {
        let p = MockProvider::new();
        let payload = p.make_identify_payload(&image()).unwrap();
        let request = serde_json::to_string(&payload).unwrap();
        let response = p.make_http_request(&request).unwrap();
        let content = p.parse_response_text(&response).unwrap().unwrap();
        let v: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(v["breedName"], "Gir");
        assert_eq!(v["confidence"], 0.92);
        assert_eq!(v["breedInfo"]["origin"], "Gujarat, India");
    }

    #[test]
    fn test_identify_responses_rotate() {
        let p = MockProvider::new();
        let payload = p.make_identify_payload(&image()).unwrap();
        let request = serde_json::to_string(&payload).unwrap();
        let mut names = Vec::new();
        for _ in 0..4 {
            let response = p.make_http_request(&request).unwrap();
            let content = p.parse_response_text(&response).unwrap().unwrap();
            let v: Value = serde_json::from_str(&content).unwrap();
            names.push(v["breedName"].as_str().unwrap().to_string());
        }
        assert_eq!(names, vec!["Gir", "Sahiwal", "Red Sindhi", "Murrah Buffalo"]);
    }

    #[test]
    fn test_analysis_response_is_free_text() {
        let p = MockProvider::new();
        let payload = p
            .make_analysis_payload(&image(), AnalysisFocus::Health)
            .unwrap();
        let request = serde_json::to_string(&payload).unwrap();
        let response = p.make_http_request(&request).unwrap();
        let content = p.parse_response_text(&response).unwrap().unwrap();
        assert!(content.contains("focus: health"));
        // 構造化JSONではない
        assert!(serde_json::from_str::<Value>(&content).is_err());
    }
}
