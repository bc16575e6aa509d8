// 分页
// 固定每页 10 条，页码从 1 开始

/// 每页题目数
pub const QUESTIONS_PER_PAGE: usize = 10;

/// 解析 `page` 参数，缺省、无法解析或非正数时为第 1 页
pub fn parse_page(raw: Option<&str>) -> usize {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|page| *page >= 1)
        .map(|page| usize::try_from(page).unwrap_or(usize::MAX))
        .unwrap_or(1)
}

/// 取第 `page` 页，超出范围时返回空列表
pub fn paginate<T: Clone>(items: &[T], page: usize) -> Vec<T> {
    let start = page.max(1).saturating_sub(1).saturating_mul(QUESTIONS_PER_PAGE);
    if start >= items.len() {
        return Vec::new();
    }
    let end = start.saturating_add(QUESTIONS_PER_PAGE).min(items.len());
    items[start..end].to_vec()
}
