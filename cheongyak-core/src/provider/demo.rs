//! Demo provider for offline development.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::json;

use super::{DetailProvider, ProviderError};
use crate::types::{DetailRecord, Identifier};

/// Serves a few fixed announcements shaped like 청약홈 detail rows.
///
/// Lets the web stack and mobile client run without a service key.
#[derive(Debug, Clone)]
pub struct DemoProvider {
    records: HashMap<String, DetailRecord>,
}

impl DemoProvider {
    pub fn new() -> Self {
        let records = demo_records()
            .into_iter()
            .filter_map(|value| {
                let id = value.get("HOUSE_MANAGE_NO")?.as_str()?.to_string();
                Some((id, DetailRecord::new(value)))
            })
            .collect();

        Self { records }
    }

    /// Identifiers the demo provider knows about, sorted.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.records.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for DemoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DetailProvider for DemoProvider {
    async fn get_detail_by_id(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<DetailRecord>, ProviderError> {
        Ok(self.records.get(identifier.as_str()).cloned())
    }
}

fn demo_records() -> Vec<serde_json::Value> {
    vec![
        json!({
            "HOUSE_MANAGE_NO": "2024000123",
            "PBLANC_NO": "2024000123",
            "HOUSE_NM": "래미안 데모 포레스트",
            "HOUSE_SECD_NM": "APT",
            "HSSPLY_ADRES": "서울특별시 강동구 천호대로 1000",
            "TOT_SUPLY_HSHLDCO": 512,
            "RCRIT_PBLANC_DE": "2024-03-15",
            "RCEPT_BGNDE": "2024-03-25",
            "RCEPT_ENDDE": "2024-03-27",
            "PRZWNER_PRESNATN_DE": "2024-04-03",
            "CNTRCT_CNCLS_BGNDE": "2024-04-15",
            "CNTRCT_CNCLS_ENDDE": "2024-04-17",
            "MVN_PREARNGE_YM": "202710",
            "CNSTRCT_ENTRPS_NM": "데모건설(주)",
            "MDHS_TELNO": "0215880000",
            "PBLANC_URL": "https://www.applyhome.co.kr/ai/aia/selectAPTLttotPblancDetail.do?houseManageNo=2024000123"
        }),
        json!({
            "HOUSE_MANAGE_NO": "2024000456",
            "PBLANC_NO": "2024000456",
            "HOUSE_NM": "힐스테이트 데모 센트럴",
            "HOUSE_SECD_NM": "APT",
            "HSSPLY_ADRES": "경기도 성남시 분당구 판교로 200",
            "TOT_SUPLY_HSHLDCO": 1024,
            "RCRIT_PBLANC_DE": "2024-05-02",
            "RCEPT_BGNDE": "2024-05-13",
            "RCEPT_ENDDE": "2024-05-15",
            "PRZWNER_PRESNATN_DE": "2024-05-22",
            "CNTRCT_CNCLS_BGNDE": "2024-06-03",
            "CNTRCT_CNCLS_ENDDE": "2024-06-05",
            "MVN_PREARNGE_YM": "202712",
            "CNSTRCT_ENTRPS_NM": "데모이앤씨(주)",
            "MDHS_TELNO": "0317000000",
            "PBLANC_URL": "https://www.applyhome.co.kr/ai/aia/selectAPTLttotPblancDetail.do?houseManageNo=2024000456"
        }),
    ]
}
