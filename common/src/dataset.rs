//! カテゴリ別データセット
//!
//! JSONドキュメントはカテゴリ名をキーとするオブジェクト。
//! カテゴリの並び順はドキュメントの順序をそのまま保持する。

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::Entry;

/// 1カテゴリ分のエントリ列
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Category {
    pub name: String,
    pub entries: Vec<Entry>,
}

/// データセット全体
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    categories: Vec<Category>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// カテゴリを末尾に追加（同名カテゴリがあればエントリを置き換える）
    pub fn insert(&mut self, name: impl Into<String>, entries: Vec<Entry>) {
        let name = name.into();
        match self.categories.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.entries = entries,
            None => self.categories.push(Category { name, entries }),
        }
    }

    /// ドキュメント順のカテゴリ
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, name: &str) -> Option<&[Entry]> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.entries.as_slice())
    }

    pub fn entry_mut(&mut self, category: &str, index: usize) -> Option<&mut Entry> {
        self.categories
            .iter_mut()
            .find(|c| c.name == category)
            .and_then(|c| c.entries.get_mut(index))
    }

    /// 全エントリ数
    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for Dataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for category in &self.categories {
            map.serialize_entry(&category.name, &category.entries)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Dataset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DatasetVisitor)
    }
}

struct DatasetVisitor;

impl<'de> Visitor<'de> for DatasetVisitor {
    type Value = Dataset;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping category names to entry arrays")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Dataset, A::Error> {
        let mut categories: Vec<Category> = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, entries)) = access.next_entry::<String, Vec<Entry>>()? {
            if categories.iter().any(|c| c.name == name) {
                return Err(serde::de::Error::custom(format!(
                    "duplicate category `{}`",
                    name
                )));
            }
            categories.push(Category { name, entries });
        }
        Ok(Dataset { categories })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_order_is_preserved() {
        let json = r#"{"zeta": [], "alpha": [{"id": "1"}], "mid": []}"#;
        let dataset: Dataset = serde_json::from_str(json).unwrap();

        let names: Vec<&str> = dataset.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);

        let out = serde_json::to_string(&dataset).unwrap();
        let zeta = out.find("zeta").unwrap();
        let alpha = out.find("alpha").unwrap();
        let mid = out.find("mid").unwrap();
        assert!(zeta < alpha && alpha < mid);
    }

    #[test]
    fn test_duplicate_category_is_rejected() {
        let json = r#"{"art": [], "art": []}"#;
        let result = serde_json::from_str::<Dataset>(json);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("duplicate category"));
    }

    #[test]
    fn test_non_object_document_is_rejected() {
        assert!(serde_json::from_str::<Dataset>("[1, 2, 3]").is_err());
        assert!(serde_json::from_str::<Dataset>(r#"{"art": "nope"}"#).is_err());
    }

    #[test]
    fn test_entry_mut_and_len() {
        let json = r#"{"art": [{"id": "a"}, {"id": "b"}], "design": [{"id": "c"}]}"#;
        let mut dataset: Dataset = serde_json::from_str(json).unwrap();
        assert_eq!(dataset.len(), 3);

        dataset.entry_mut("art", 1).unwrap().text = "changed".to_string();
        assert_eq!(dataset.get("art").unwrap()[1].text, "changed");
        assert!(dataset.entry_mut("art", 5).is_none());
        assert!(dataset.entry_mut("missing", 0).is_none());
    }

    #[test]
    fn test_insert_replaces_existing_category() {
        let mut dataset = Dataset::new();
        dataset.insert("art", vec![Entry::default()]);
        dataset.insert("design", vec![]);
        dataset.insert("art", vec![]);

        assert_eq!(dataset.categories().len(), 2);
        assert_eq!(dataset.categories()[0].name, "art");
        assert!(dataset.is_empty());
    }
}
