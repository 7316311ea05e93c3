//! Minimal booktabs table writer for the report appendix.

/// A `table` float with a single `tabular` built from pre-formatted rows.
#[derive(Debug, Clone, Default)]
pub struct LatexTable {
    caption: String,
    label: String,
    columns: String,
    small: bool,
    head: Vec<String>,
    sections: Vec<Vec<String>>,
    notes: Vec<String>,
}

impl LatexTable {
    pub fn new(caption: impl Into<String>, label: impl Into<String>, columns: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            label: label.into(),
            columns: columns.into(),
            ..Default::default()
        }
    }

    pub fn small(mut self) -> Self {
        self.small = true;
        self
    }

    /// Raw line placed between `\toprule` and the first `\midrule`.
    pub fn head_line(mut self, line: impl Into<String>) -> Self {
        self.head.push(line.into());
        self
    }

    /// Body block; consecutive sections are separated by `\midrule`.
    pub fn section(mut self, lines: Vec<String>) -> Self {
        self.sections.push(lines);
        self
    }

    pub fn column_count(&self) -> usize {
        self.columns.chars().filter(|c| matches!(c, 'l' | 'c' | 'r' | 'p')).count()
    }

    /// Spanning note row across every column.
    pub fn note(mut self, text: impl AsRef<str>) -> Self {
        let line = format!("\\multicolumn{{{}}}{{l}}{{{}}} \\\\", self.column_count(), text.as_ref());
        self.notes.push(line);
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::from("\n\\begin{table}[H]\n\\centering\n");
        out.push_str(&format!("\\caption{{{}}}\n", self.caption));
        out.push_str(&format!("\\label{{{}}}\n", self.label));
        if self.small {
            out.push_str("\\small\n");
        }
        out.push_str(&format!("\\begin{{tabular}}{{{}}}\n", self.columns));
        out.push_str("\\toprule\n");
        for line in &self.head {
            out.push_str(line);
            out.push('\n');
        }
        for section in &self.sections {
            out.push_str("\\midrule\n");
            for line in section {
                out.push_str(line);
                out.push('\n');
            }
        }
        out.push_str("\\bottomrule\n");
        for line in &self.notes {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str("\\end{tabular}\n\\end{table}\n");
        out
    }
}

/// Join cells into one tabular row.
pub fn row<S: AsRef<str>>(cells: &[S]) -> String {
    let joined: Vec<&str> = cells.iter().map(|c| c.as_ref()).collect();
    format!("{} \\\\", joined.join(" & "))
}

pub fn bold(text: &str) -> String {
    format!("\\textbf{{{}}}", text)
}

/// Escape characters that are special in running LaTeX text.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '%' | '&' | '_' | '#' | '$' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}
