use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// 从右到左 / 从左到右 不可见标记
const BIDI_MARKS: [char; 2] = ['\u{200E}', '\u{200F}'];

static RE_DATE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+\d{1,2}[-/]\d{1,2}.*$").expect("valid date suffix regex"));
static RE_DATE_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+\d{1,2}-\d{1,2}$").expect("valid date range regex"));
static RE_COPY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*-?\s*copy\s*\d*").expect("valid copy regex"));
static RE_COPY_OF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*copy\s+\d+\s+of\s+").expect("valid copy-of regex"));
static RE_SCALE_OF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^scale\s+of\s+").expect("valid scale regex"));
static RE_NEW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^new\s+").expect("valid new regex"));
static RE_DASH_GAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+[-–—]\s+").expect("valid dash regex"));
static RE_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// 规范化广告名称，得到分组/匹配用的键
///
/// 清洗管线会重复执行直到结果不再变化，所以对任意输入
/// `normalize(normalize(x)) == normalize(x)`。
pub fn normalize(raw: &str) -> String {
    let mut current = normalize_once(raw);
    loop {
        let next = normalize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// 单元格值 -> 规范化名称；空值按文本 "nan" 处理
pub fn normalize_value(value: &Value) -> String {
    normalize(&value_to_text(value))
}

pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => "nan".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn normalize_once(raw: &str) -> String {
    let name: String = raw.chars().filter(|c| !BIDI_MARKS.contains(c)).collect();

    let name = RE_DATE_SUFFIX.replace_all(&name, "");
    let name = RE_DATE_RANGE.replace_all(&name, "");

    let name = RE_COPY.replace_all(&name, "");
    let name = RE_COPY_OF.replace_all(&name, "");

    let name = RE_SCALE_OF.replace(&name, "");
    let name = RE_NEW.replace(&name, "");

    let name = RE_DASH_GAP.replace_all(&name, " ");
    let name = RE_SPACES.replace_all(&name, " ");

    name.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_copy_markers_dates_and_prefixes() {
        assert_eq!(normalize("Summer Sale - Copy 2"), "Summer Sale");
        assert_eq!(normalize("Summer Sale  12/15"), "Summer Sale");
        assert_eq!(normalize("New Summer Sale"), "Summer Sale");
        assert_eq!(normalize("scale of Summer Sale"), "Summer Sale");
        assert_eq!(normalize("Summer Sale - copy"), "Summer Sale");
    }

    #[test]
    fn date_suffix_drops_everything_after_it() {
        assert_eq!(normalize("Winter Coat 9/20 retarget broad"), "Winter Coat");
        assert_eq!(normalize("Winter Coat 12-15"), "Winter Coat");
    }

    #[test]
    fn removes_bidi_marks() {
        assert_eq!(normalize("\u{200F}فستان صيفي\u{200E}"), "فستان صيفي");
    }

    #[test]
    fn dash_separated_segments_merge() {
        assert_eq!(normalize("Dress – Red — Large - V2"), "Dress Red Large V2");
        // 非空白包围的连字符保留
        assert_eq!(normalize("T-Shirt Promo"), "T-Shirt Promo");
    }

    #[test]
    fn collapses_whitespace_and_trims() {
        assert_eq!(normalize("  Bag \t  Promo  "), "Bag Promo");
    }

    #[test]
    fn null_cell_becomes_nan() {
        assert_eq!(normalize_value(&Value::Null), "nan");
        assert_eq!(normalize_value(&Value::from(42)), "42");
    }

    #[test]
    fn idempotent_on_stacked_noise() {
        let inputs = [
            "New New Summer Sale",
            "scale of New Summer Sale - Copy 3",
            "  New\tBag - Copy",
            "Copy 2 of Summer Sale 1/2",
            "Promo — — Final",
            "",
            "nan",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input: {input:?}");
        }
        assert_eq!(normalize("New New Summer Sale"), "Summer Sale");
    }
}
