use crate::config::MatchingConfig;
use std::collections::{HashMap, HashSet};

/// 序列长度达到此值时启用"高频元素"启发式
const AUTOJUNK_MIN_LEN: usize = 200;

/// 最长公共匹配块相似度，返回 [0, 1]
///
/// Ratcliff/Obershelp 匹配块算法：`2 * M / (len(a) + len(b))`，
/// M 为递归找到的所有最长匹配块长度之和。
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matches = BlockMatcher::new(&a, &b).matched_len();
    2.0 * matches as f64 / total as f64
}

struct BlockMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> BlockMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, ch) in b.iter().enumerate() {
            b2j.entry(*ch).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let ntest = b.len() / 100 + 1;
            let popular: HashSet<char> = b2j
                .iter()
                .filter(|(_, idxs)| idxs.len() > ntest)
                .map(|(ch, _)| *ch)
                .collect();
            for ch in popular {
                b2j.remove(&ch);
            }
        }

        Self { a, b, b2j }
    }

    /// a[alo..ahi] 与 b[blo..bhi] 中最长的匹配块 (i, j, size)
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0usize);
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut new_j2len: HashMap<usize, usize> = HashMap::new();
            if let Some(indices) = self.b2j.get(&self.a[i]) {
                for &j in indices {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let prev = if j > 0 { j2len.get(&(j - 1)).copied().unwrap_or(0) } else { 0 };
                    let k = prev + 1;
                    new_j2len.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = new_j2len;
        }

        // 高频元素被剔出 b2j 后，在两端补齐
        while besti > alo && bestj > blo && self.a[besti - 1] == self.b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && self.a[besti + bestsize] == self.b[bestj + bestsize]
        {
            bestsize += 1;
        }

        (besti, bestj, bestsize)
    }

    fn matched_len(&self) -> usize {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut matched = 0;

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            matched += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }

        matched
    }
}

/// 广告名称 vs 产品名称评分器
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityScorer {
    pub threshold: f64,
    pub token_bonus: f64,
    pub min_token_len: usize,
}

impl SimilarityScorer {
    pub fn new(config: &MatchingConfig) -> Self {
        Self {
            threshold: config.threshold,
            token_bonus: config.token_bonus,
            min_token_len: config.min_token_len,
        }
    }

    /// 基础相似度 (0-100) + 词重叠加分 (不设上限)
    pub fn score(&self, campaign_name: &str, product_name: &str) -> f64 {
        let campaign = campaign_name.to_lowercase();
        let product = product_name.to_lowercase();

        let base = sequence_ratio(&campaign, &product) * 100.0;

        let hits = campaign
            .split_whitespace()
            .filter(|token| token.chars().count() > self.min_token_len)
            .filter(|token| product.contains(token))
            .count();

        base + hits as f64 * self.token_bonus
    }

    /// 按配置的阈值找最佳产品
    pub fn best_match<'p, S: AsRef<str>>(&self, campaign_name: &str, products: &'p [S]) -> (Option<&'p str>, f64) {
        find_best_match(self, campaign_name, products, self.threshold)
    }
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self::new(&MatchingConfig::default())
    }
}

/// 返回严格超过阈值的最高分产品；平分时先出现者优先。
/// 无产品超过阈值时返回 `(None, threshold)`，此分数不代表匹配。
pub fn find_best_match<'p, S: AsRef<str>>(
    scorer: &SimilarityScorer,
    campaign_name: &str,
    products: &'p [S],
    threshold: f64,
) -> (Option<&'p str>, f64) {
    let mut best: Option<&'p str> = None;
    let mut best_score = threshold;

    for product in products {
        let product = product.as_ref();
        let score = scorer.score(campaign_name, product);
        if score > best_score {
            best = Some(product);
            best_score = score;
        }
    }

    (best, best_score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn ratio_matches_reference_values() {
        assert!(approx(sequence_ratio("abcd", "bcde"), 0.75));
        // "summer sale" 完整包含于 "summer sale dress": 22 / 28
        assert!(approx(sequence_ratio("summer sale", "summer sale dress"), 22.0 / 28.0));
        assert!(approx(sequence_ratio("", ""), 1.0));
        assert!(approx(sequence_ratio("abc", ""), 0.0));
        assert!(approx(sequence_ratio("abc", "xyz"), 0.0));
        // 只取 't' 一个块，后续子区间为空
        assert!(approx(sequence_ratio("tide", "diet"), 0.25));
    }

    #[test]
    fn popular_elements_still_extend_blocks() {
        let a = "a".repeat(250) + "bc";
        let b = "a".repeat(240) + "cb";
        // 'a' 为高频元素，仍可通过两端扩展匹配: 482 / 494
        assert!(approx(sequence_ratio(&a, &b), 482.0 / 494.0));
    }

    #[test]
    fn token_bonus_rewards_shared_words() {
        let scorer = SimilarityScorer::default();
        let score = scorer.score("Summer Sale", "Summer Sale Dress");
        // "summer" 与 "sale" 都长于 3 个字符
        assert!(approx(score, 22.0 / 28.0 * 100.0 + 40.0));
    }

    #[test]
    fn short_tokens_earn_no_bonus() {
        let scorer = SimilarityScorer::default();
        let base = sequence_ratio("red bag", "red bag xl") * 100.0;
        assert!(approx(scorer.score("Red Bag", "Red Bag XL"), base));
    }

    #[test]
    fn best_match_picks_summer_dress() {
        let scorer = SimilarityScorer::default();
        let products = ["Summer Sale Dress", "Winter Coat"];
        let (best, score) = scorer.best_match("Summer Sale", &products);
        assert_eq!(best, Some("Summer Sale Dress"));
        assert!(score > 60.0);
    }

    #[test]
    fn empty_catalog_returns_threshold_sentinel() {
        let scorer = SimilarityScorer::default();
        let empty: [&str; 0] = [];
        assert_eq!(find_best_match(&scorer, "Summer Sale", &empty, 60.0), (None, 60.0));
    }

    #[test]
    fn nothing_above_threshold_returns_sentinel() {
        let scorer = SimilarityScorer::default();
        let products = ["Winter Coat"];
        assert!(scorer.score("Garden Hose", "Winter Coat") < 60.0);
        assert_eq!(find_best_match(&scorer, "Garden Hose", &products, 60.0), (None, 60.0));
    }

    #[test]
    fn higher_score_wins_regardless_of_order() {
        let scorer = SimilarityScorer::default();
        let p = "Leather Wallet";
        let q = "Leather Wallet Brown Large";
        let a = "Leather Wallet";
        assert!(scorer.score(a, p) > scorer.score(a, q));
        assert_eq!(find_best_match(&scorer, a, &[p, q], 60.0).0, Some(p));
        assert_eq!(find_best_match(&scorer, a, &[q, p], 60.0).0, Some(p));
    }

    #[test]
    fn ties_go_to_first_seen() {
        let scorer = SimilarityScorer::default();
        let products = ["Summer Sale Dress", "Summer Sale Dress"];
        let products_owned: Vec<String> = products.iter().map(|s| s.to_string()).collect();
        let (best, _) = find_best_match(&scorer, "Summer Sale", &products_owned, 60.0);
        assert!(std::ptr::eq(best.unwrap(), products_owned[0].as_str()));
    }
}
