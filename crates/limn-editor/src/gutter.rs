use limn_lint::FlaggedLines;

/// One row of the line-number column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayLine {
    /// 1-based line number.
    pub number: usize,
    /// Render with the error presentation.
    pub flagged: bool,
}

/// Recompute the full line-number column. Line `i` (0-based) is numbered
/// `i + 1`; flags outside the buffer's line count are ignored. An empty
/// buffer still shows line 1.
pub fn render_gutter(source: &str, flagged: &FlaggedLines) -> Vec<DisplayLine> {
    source
        .split('\n')
        .enumerate()
        .map(|(index, _)| {
            let number = index + 1;
            DisplayLine {
                number,
                flagged: flagged.contains(&number),
            }
        })
        .collect()
}
