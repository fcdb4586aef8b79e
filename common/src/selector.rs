//! 解析対象ジョブの選定
//!
//! 対象条件:
//! - カテゴリが許可リストに含まれる
//! - 空でないメディアURLを持つ
//! - 解析結果をまだ持たない
//!
//! 並び順はデータセットのカテゴリ順、カテゴリ内はインデックス順。

use crate::dataset::Dataset;
use crate::types::Entry;

/// 解析ジョブ1件
///
/// エントリは複製を所有するため、並行実行中に他のジョブと状態を共有しない。
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub category: String,
    pub index: usize,
    pub entry: Entry,
}

/// 選定時の内訳
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionSummary {
    /// 対象となるエントリ数（limit適用前）
    pub eligible: usize,
    /// 解析済みのためスキップ
    pub already_analyzed: usize,
    /// メディアなしのためスキップ
    pub without_media: usize,
}

fn is_allowed(category: &str, eligible_categories: &[String]) -> bool {
    eligible_categories.iter().any(|c| c == category)
}

/// 対象ジョブを決定的な順序で列挙する
///
/// `limit` は先頭からN件に切り詰める（サンプリングはしない）。
pub fn select_jobs(dataset: &Dataset, eligible_categories: &[String], limit: Option<usize>) -> Vec<Job> {
    let jobs = dataset
        .categories()
        .iter()
        .filter(|c| is_allowed(&c.name, eligible_categories))
        .flat_map(|c| {
            c.entries
                .iter()
                .enumerate()
                .filter(|(_, e)| e.has_media() && !e.is_analyzed())
                .map(move |(index, entry)| Job {
                    category: c.name.clone(),
                    index,
                    entry: entry.clone(),
                })
        });

    match limit {
        Some(n) => jobs.take(n).collect(),
        None => jobs.collect(),
    }
}

/// 許可カテゴリ内のエントリを内訳ごとに数える
pub fn summarize(dataset: &Dataset, eligible_categories: &[String]) -> SelectionSummary {
    let mut summary = SelectionSummary::default();

    for entry in dataset
        .categories()
        .iter()
        .filter(|c| is_allowed(&c.name, eligible_categories))
        .flat_map(|c| c.entries.iter())
    {
        if entry.is_analyzed() {
            summary.already_analyzed += 1;
        } else if !entry.has_media() {
            summary.without_media += 1;
        } else {
            summary.eligible += 1;
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StyleAnalysis;

    fn entry(id: &str, media: Option<&str>) -> Entry {
        Entry {
            id: id.to_string(),
            media_type: media.map(|_| "photo".to_string()),
            media_url: media.map(str::to_string),
            ..Default::default()
        }
    }

    fn analyzed(id: &str) -> Entry {
        let mut e = entry(id, Some("https://cdn.example.com/done.jpg"));
        e.attach_analysis(StyleAnalysis {
            prompt: "done".to_string(),
            ..Default::default()
        });
        e
    }

    fn categories(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn sample_dataset() -> Dataset {
        let mut dataset = Dataset::new();
        dataset.insert("art", vec![
            entry("a0", Some("https://cdn.example.com/a0.jpg")),
            analyzed("a1"),
            entry("a2", None),
            entry("a3", Some("https://cdn.example.com/a3.jpg")),
        ]);
        dataset.insert("memes", vec![entry("m0", Some("https://cdn.example.com/m0.jpg"))]);
        dataset.insert("design", vec![
            entry("d0", Some("https://cdn.example.com/d0.jpg")),
            entry("d1", Some("")),
        ]);
        dataset
    }

    fn ids(jobs: &[Job]) -> Vec<&str> {
        jobs.iter().map(|j| j.entry.id.as_str()).collect()
    }

    #[test]
    fn test_select_skips_analyzed_and_no_media_entries() {
        let jobs = select_jobs(&sample_dataset(), &categories(&["art", "design"]), None);
        assert_eq!(ids(&jobs), vec!["a0", "a3", "d0"]);
        assert_eq!(jobs[1].category, "art");
        assert_eq!(jobs[1].index, 3);
        assert_eq!(jobs[2].index, 0);
    }

    #[test]
    fn test_select_follows_dataset_category_order() {
        // 許可リストの順序ではなくデータセットの順序
        let jobs = select_jobs(&sample_dataset(), &categories(&["design", "art"]), None);
        assert_eq!(ids(&jobs), vec!["a0", "a3", "d0"]);
    }

    #[test]
    fn test_select_ignores_unlisted_categories() {
        let jobs = select_jobs(&sample_dataset(), &categories(&["memes"]), None);
        assert_eq!(ids(&jobs), vec!["m0"]);

        let none = select_jobs(&sample_dataset(), &[], None);
        assert!(none.is_empty());
    }

    #[test]
    fn test_limit_takes_prefix() {
        let mut dataset = Dataset::new();
        dataset.insert("art", (0..6).map(|i| entry(&format!("a{}", i), Some("https://x/a.jpg"))).collect());
        dataset.insert("design", (0..4).map(|i| entry(&format!("d{}", i), Some("https://x/d.jpg"))).collect());
        let allowed = categories(&["art", "design"]);

        let jobs = select_jobs(&dataset, &allowed, Some(3));
        assert_eq!(ids(&jobs), vec!["a0", "a1", "a2"]);

        let jobs = select_jobs(&dataset, &allowed, Some(8));
        assert_eq!(ids(&jobs), vec!["a0", "a1", "a2", "a3", "a4", "a5", "d0", "d1"]);

        assert!(select_jobs(&dataset, &allowed, Some(0)).is_empty());
        assert_eq!(select_jobs(&dataset, &allowed, Some(100)).len(), 10);
    }

    #[test]
    fn test_selection_is_idempotent_after_attach() {
        let mut dataset = sample_dataset();
        let allowed = categories(&["art", "design"]);

        for job in select_jobs(&dataset, &allowed, None) {
            dataset
                .entry_mut(&job.category, job.index)
                .unwrap()
                .attach_analysis(StyleAnalysis {
                    prompt: "x".to_string(),
                    ..Default::default()
                });
        }

        assert!(select_jobs(&dataset, &allowed, None).is_empty());
    }

    #[test]
    fn test_summarize_counts() {
        let summary = summarize(&sample_dataset(), &categories(&["art", "design"]));
        assert_eq!(summary, SelectionSummary {
            eligible: 3,
            already_analyzed: 1,
            without_media: 2,
        });
    }
}
