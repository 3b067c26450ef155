use std::io::{self, Write};

use gazette_engine::{DashboardStats, Document, FilterOptions, Pagination, QueryInfo};
use gazette_protocol::QueryMetrics;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output with optional colors.
    #[default]
    Human,
    /// NDJSON (newline-delimited JSON) for machine consumption.
    Json,
}

/// Color handling strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorChoice {
    /// Automatically detect TTY and enable colors if appropriate.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

/// Configuration for printing query results.
#[derive(Debug, Clone)]
pub struct PrinterConfig {
    /// Output format (human or JSON).
    pub format: OutputFormat,
    /// Color handling strategy.
    pub color: ColorChoice,
    /// Whether to show timing statistics.
    pub show_timing: bool,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: ColorChoice::Auto,
            show_timing: true,
        }
    }
}

/// Human-readable printer with optional color support.
pub struct HumanPrinter<W: Write, E: Write> {
    out: W,
    err: E,
    cfg: PrinterConfig,
    use_color: bool,
}

impl<W: Write, E: Write> HumanPrinter<W, E> {
    /// `ColorChoice::Auto` means no color here: a generic writer cannot be
    /// checked for a terminal.
    pub fn new(out: W, err: E, cfg: PrinterConfig) -> Self {
        let use_color = cfg.color == ColorChoice::Always;
        Self {
            out,
            err,
            cfg,
            use_color,
        }
    }

    /// Create a printer that writes to stdout and stderr with TTY detection.
    pub fn stdout(cfg: PrinterConfig) -> HumanPrinter<io::Stdout, io::Stderr> {
        use std::io::IsTerminal;

        let use_color = match cfg.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => io::stdout().is_terminal(),
        };

        HumanPrinter {
            out: io::stdout(),
            err: io::stderr(),
            cfg,
            use_color,
        }
    }

    #[inline]
    fn format_id(&self, id: &str) -> String {
        if self.use_color {
            format!("\x1b[32m{}\x1b[0m", id)
        } else {
            id.to_owned()
        }
    }
}

pub struct JsonPrinter<W: Write, E: Write> {
    out: W,
    err: E,
    cfg: PrinterConfig,
}

impl<W: Write, E: Write> JsonPrinter<W, E> {
    pub fn new(out: W, err: E, cfg: PrinterConfig) -> Self {
        Self { out, err, cfg }
    }

    /// Create a printer that writes to stdout and stderr.
    pub fn stdout(cfg: PrinterConfig) -> JsonPrinter<io::Stdout, io::Stderr> {
        JsonPrinter {
            out: io::stdout(),
            err: io::stderr(),
            cfg,
        }
    }
}

/// Static context about a print run.
#[derive(Debug)]
pub struct QueryPrintContext<'a> {
    /// Label for this query type
    pub kind: &'a str,
    pub pagination: &'a Pagination,
    pub query_info: &'a QueryInfo,
    /// Optional timing metrics.
    pub metrics: Option<&'a QueryMetrics>,
}

/// One row in the result stream.
#[derive(Debug)]
pub struct QueryRow<'a> {
    /// 1-based position across all pages.
    pub rank: usize,
    pub document: &'a Document,
}

/// Trait for printing query results.
///
/// Implementations receive a stream of rows and context, and are responsible
/// for formatting and outputting them appropriately.
pub trait QueryPrinter {
    /// Called once before any rows are printed.
    fn begin(&mut self, ctx: &QueryPrintContext) -> io::Result<()>;

    /// Called for each result row.
    fn print_row(&mut self, row: &QueryRow<'_>, ctx: &QueryPrintContext) -> io::Result<()>;

    /// Called once after all rows are printed.
    ///
    /// Use this for footers, summaries, and timing information.
    fn finish(&mut self, ctx: &QueryPrintContext) -> io::Result<()>;

    fn print_dashboard(&mut self, stats: &DashboardStats) -> io::Result<()>;

    fn print_filter_options(&mut self, partition: &str, options: &FilterOptions) -> io::Result<()>;
}

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

impl<W: Write, E: Write> QueryPrinter for HumanPrinter<W, E> {
    fn begin(&mut self, ctx: &QueryPrintContext) -> io::Result<()> {
        for name in &ctx.query_info.failed_partitions {
            writeln!(self.err, "[warn] partition {name} could not be searched")?;
        }
        Ok(())
    }

    fn print_row(&mut self, row: &QueryRow<'_>, _ctx: &QueryPrintContext) -> io::Result<()> {
        let doc = row.document;
        let marker = if doc.is_available() { ' ' } else { '!' };
        let id = self.format_id(&doc.document_id);
        writeln!(
            self.out,
            "{:>4}{} {:<10}  {}  {:<20}  {}",
            row.rank,
            marker,
            or_dash(doc.document_date.as_deref()),
            id,
            or_dash(doc.document_type.as_deref()),
            or_dash(doc.description.as_deref()),
        )
    }

    fn finish(&mut self, ctx: &QueryPrintContext) -> io::Result<()> {
        let p = ctx.pagination;
        if p.total_count == 0 {
            writeln!(self.out, "No matching documents.")?;
        } else {
            writeln!(
                self.out,
                "\nShowing {}-{} of {} (page {}/{})",
                p.start_index, p.end_index, p.total_count, p.current_page, p.total_pages
            )?;
        }

        if self.cfg.show_timing
            && let Some(m) = ctx.metrics
        {
            writeln!(
                self.err,
                "\n[{}] {} results in {:.2}ms (parse: {:.2}ms, exec: {:.2}ms, page: {:.2}ms)",
                ctx.kind, p.total_count, m.total_ms, m.parse_ms, m.exec_ms, m.paginate_ms,
            )?;
        }

        Ok(())
    }

    fn print_dashboard(&mut self, stats: &DashboardStats) -> io::Result<()> {
        writeln!(self.out, "documents:  {}", stats.total_docs)?;
        writeln!(self.out, "available:  {}", stats.available_docs)?;
        match stats.years_covered {
            Some(years) => writeln!(self.out, "years:      {}-{}", years.from, years.to)?,
            None => writeln!(self.out, "years:      -")?,
        }
        writeln!(self.out, "types:      {}", stats.document_types.join(", "))?;
        for name in &stats.failed_partitions {
            writeln!(self.err, "[warn] partition {name} left out of totals")?;
        }
        Ok(())
    }

    fn print_filter_options(&mut self, partition: &str, options: &FilterOptions) -> io::Result<()> {
        writeln!(self.out, "partition:  {partition}")?;
        writeln!(self.out, "months:     {}", options.months.join(" "))?;
        writeln!(self.out, "days:       {}", options.days.join(" "))?;
        writeln!(self.out, "types:      {}", options.document_types.join(", "))
    }
}

impl<W: Write, E: Write> QueryPrinter for JsonPrinter<W, E> {
    fn begin(&mut self, _ctx: &QueryPrintContext) -> io::Result<()> {
        Ok(())
    }

    fn print_row(&mut self, row: &QueryRow<'_>, ctx: &QueryPrintContext) -> io::Result<()> {
        let obj = serde_json::json!({
            "kind": ctx.kind,
            "rank": row.rank,
            "document": row.document,
        });
        writeln!(self.out, "{}", obj)
    }

    fn finish(&mut self, ctx: &QueryPrintContext) -> io::Result<()> {
        let obj = serde_json::json!({
            "type": "summary",
            "kind": ctx.kind,
            "pagination": ctx.pagination,
            "query_info": ctx.query_info,
        });
        writeln!(self.out, "{}", obj)?;

        if self.cfg.show_timing
            && let Some(m) = ctx.metrics
        {
            let obj = serde_json::json!({
                "type": "timing",
                "kind": ctx.kind,
                "timing_ms": {
                    "total": m.total_ms,
                    "parse": m.parse_ms,
                    "exec": m.exec_ms,
                    "paginate": m.paginate_ms,
                }
            });
            writeln!(self.err, "{}", obj)?;
        }

        Ok(())
    }

    fn print_dashboard(&mut self, stats: &DashboardStats) -> io::Result<()> {
        writeln!(self.out, "{}", serde_json::json!(stats))
    }

    fn print_filter_options(&mut self, partition: &str, options: &FilterOptions) -> io::Result<()> {
        let obj = serde_json::json!({
            "partition": partition,
            "options": options,
        });
        writeln!(self.out, "{}", obj)
    }
}

#[cfg(test)]
#[path = "printer_tests.rs"]
mod tests;
