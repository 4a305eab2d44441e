//! 接口响应模型与记录展平
//!
//! ## 职责
//!
//! - 描述 `getArticles` 响应中的配件结构
//! - 将嵌套的子列表展平为可直接写入 CSV 的行

use serde::{Deserialize, Serialize};

/// 200 响应体
#[derive(Debug, Clone, Deserialize)]
pub struct ArticlesResponse {
    #[serde(default)]
    pub articles: Vec<Article>,
}

/// 单个配件
///
/// 连接键为 `{dataSupplierId, articleNumber, mfrId, mfrName}`，
/// 子列表 `genericArticles` / `oemNumbers` / `searchQueryMatches` 按这些键归属于配件。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub data_supplier_id: Option<i64>,
    pub article_number: Option<String>,
    pub mfr_id: Option<i64>,
    pub mfr_name: Option<String>,
    #[serde(default)]
    pub generic_articles: Vec<GenericArticle>,
    #[serde(default)]
    pub oem_numbers: Vec<OemNumber>,
    #[serde(default)]
    pub search_query_matches: Vec<SearchQueryMatch>,
}

/// 通用物品条目
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericArticle {
    pub generic_article_id: Option<i64>,
    pub generic_article_description: Option<String>,
    pub legacy_article_id: Option<i64>,
}

/// OEM 号码条目
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OemNumber {
    pub article_number: Option<String>,
    pub mfr_id: Option<i64>,
    pub mfr_name: Option<String>,
}

/// 搜索命中条目
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQueryMatch {
    #[serde(rename = "type")]
    pub match_type: Option<String>,
    #[serde(rename = "match")]
    pub matched_number: Option<String>,
}

/// 展平后的一行记录（直接序列化为 CSV）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleRecord {
    #[serde(rename = "OEM SKU")]
    pub oem_sku: String,
    #[serde(rename = "dataSupplierId")]
    pub data_supplier_id: Option<i64>,
    #[serde(rename = "articleNumber")]
    pub article_number: Option<String>,
    #[serde(rename = "mfrId")]
    pub mfr_id: Option<i64>,
    #[serde(rename = "mfrName")]
    pub mfr_name: Option<String>,
    #[serde(rename = "matchType")]
    pub match_type: Option<String>,
    #[serde(rename = "matchedNumber")]
    pub matched_number: Option<String>,
    #[serde(rename = "genericArticleId")]
    pub generic_article_id: Option<i64>,
    #[serde(rename = "genericArticleDescription")]
    pub generic_article_description: Option<String>,
    #[serde(rename = "legacyArticleId")]
    pub legacy_article_id: Option<i64>,
    #[serde(rename = "oemArticleNumber")]
    pub oem_article_number: Option<String>,
    #[serde(rename = "oemMfrId")]
    pub oem_mfr_id: Option<i64>,
    #[serde(rename = "oemMfrName")]
    pub oem_mfr_name: Option<String>,
}

/// 将一页配件展平为记录行
///
/// 每个配件按子列表最长者产生对应数量的行，
/// 第 i 行合并各子列表的第 i 个条目，父级连接键在每行重复。
/// 子列表全部为空的配件也会产生一行。
///
/// # 参数
/// - `oem_sku`: 本次搜索的 OEM SKU，写入每行
/// - `articles`: 一页配件
///
/// # 返回
/// 返回展平后的记录行
pub fn flatten_articles(oem_sku: &str, articles: &[Article]) -> Vec<ArticleRecord> {
    let mut rows = Vec::new();

    for article in articles {
        let row_count = article
            .generic_articles
            .len()
            .max(article.oem_numbers.len())
            .max(article.search_query_matches.len())
            .max(1);

        for i in 0..row_count {
            let generic = article.generic_articles.get(i);
            let oem = article.oem_numbers.get(i);
            let query_match = article.search_query_matches.get(i);

            rows.push(ArticleRecord {
                oem_sku: oem_sku.to_string(),
                data_supplier_id: article.data_supplier_id,
                article_number: article.article_number.clone(),
                mfr_id: article.mfr_id,
                mfr_name: article.mfr_name.clone(),
                match_type: query_match.and_then(|m| m.match_type.clone()),
                matched_number: query_match.and_then(|m| m.matched_number.clone()),
                generic_article_id: generic.and_then(|g| g.generic_article_id),
                generic_article_description: generic
                    .and_then(|g| g.generic_article_description.clone()),
                legacy_article_id: generic.and_then(|g| g.legacy_article_id),
                oem_article_number: oem.and_then(|o| o.article_number.clone()),
                oem_mfr_id: oem.and_then(|o| o.mfr_id),
                oem_mfr_name: oem.and_then(|o| o.mfr_name.clone()),
            });
        }
    }

    rows
}
