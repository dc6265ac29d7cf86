//! Command implementations for the Pilum CLI.

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Instant;

use crate::analysis::AnalyzerRegistry;
use crate::analysis::analyzer::registry::analyzer_by_name;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::document::converter::DocumentConverter;
use crate::document::converter::jsonl::JsonlDocumentConverter;
use crate::error::{PilumError, Result};
use crate::index::{Index, IndexConfig, IndexReader, OpenMode};
use crate::query::*;
use crate::schema::{FieldKind, Schema};

/// Execute a CLI command.
pub fn execute_command(args: PilumArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match &args.command {
        Command::Index(index_args) => index_documents(index_args, &args, &mut out),
        Command::Search(search_args) => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            search_index(search_args, &args, &mut input, &mut out)
        }
    }
}

/// Build the analyzer registry selected by `--analyzer` and `--default-analyzer`.
pub fn build_registry(args: &AnalysisArgs) -> Result<AnalyzerRegistry> {
    let mut registry = AnalyzerRegistry::new(analyzer_by_name(&args.default_analyzer)?);
    for assignment in &args.analyzers {
        registry.add_analyzer(
            assignment.field.clone(),
            analyzer_by_name(&assignment.analyzer)?,
        );
    }
    Ok(registry)
}

/// Index every document of a JSONL file.
fn index_documents<W: Write>(args: &IndexArgs, cli_args: &PilumArgs, out: &mut W) -> Result<()> {
    let start_time = Instant::now();
    log::info!("indexing {} into {}", args.docs_path.display(), args.index_path.display());

    let config = IndexConfig::default().with_analyzers(build_registry(&args.analysis)?);
    let index = open_for_indexing(args, config)?;

    let writer = index.writer()?;
    let converter = JsonlDocumentConverter::new(Arc::clone(index.schema()));
    let mut indexed = 0u64;
    let mut skipped = 0u64;

    for document in converter.convert(&args.docs_path)? {
        let document = match document {
            Ok(document) => document,
            Err(PilumError::SchemaViolation(msg)) => {
                log::warn!("skipping document: {msg}");
                skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        match writer.add_document(document) {
            Ok(_) => indexed += 1,
            Err(PilumError::SchemaViolation(msg)) => {
                log::warn!("skipping document: {msg}");
                skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        }

        if args.commit_every.is_some_and(|every| indexed % every == 0) {
            writer.commit()?;
            log::debug!("committed after {indexed} documents");
        }
    }

    writer.close()?;
    let writer_stats = writer.stats();
    let index_stats = index.stats();

    let result = IndexingResult {
        index_path: args.index_path.display().to_string(),
        documents_indexed: indexed,
        documents_skipped: skipped,
        commits: writer_stats.commits,
        generation: index_stats.generation,
        total_documents: index_stats.doc_count,
        duration_ms: start_time.elapsed().as_millis() as u64,
    };
    output_result(&result, cli_args, out)
}

fn open_for_indexing(args: &IndexArgs, config: IndexConfig) -> Result<Index> {
    match (&args.schema, args.create) {
        (Some(schema_file), create) => {
            log::debug!("loading schema from {}", schema_file.display());
            let schema = Schema::from_json_file(schema_file)?;
            let open_mode = if create {
                OpenMode::Create
            } else {
                OpenMode::CreateOrAppend
            };
            Index::create_in_dir(&args.index_path, schema, config.with_open_mode(open_mode))
        }
        (None, true) => Err(PilumError::invalid_argument(
            "--schema is required with --create",
        )),
        (None, false) => Index::open_in_dir(&args.index_path, config),
    }
}

/// Search an index, printing one page or paging interactively.
fn search_index<R: BufRead, W: Write>(
    args: &SearchArgs,
    cli_args: &PilumArgs,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let start_time = Instant::now();
    let registry = build_registry(&args.analysis)?;
    let index = Index::open_in_dir(&args.index_path, IndexConfig::default())?;
    let query = build_query(args, index.schema(), &registry)?;
    log::info!("searching {} for `{query}`", args.index_path.display());

    let policy = if args.strict_fields {
        UnknownFieldPolicy::Error
    } else {
        UnknownFieldPolicy::Empty
    };
    let reader = index.reader();
    let searcher = reader.searcher().with_unknown_field_policy(policy);
    let scorer: Arc<dyn Scorer> = match args.scorer {
        ScorerKind::TfIdf => Arc::new(TfIdfScorer::new()),
        ScorerKind::Constant => Arc::new(ConstantScorer::default()),
    };
    let config = PagingConfig {
        hits_per_page: args.hits_per_page as usize,
        ..PagingConfig::default()
    };
    let mut cursor = searcher.paginate(query, scorer, config)?;

    if cli_args.output_format == OutputFormat::Json {
        if args.interactive {
            log::warn!("--interactive is ignored with JSON output");
        }
        let page = cursor.page()?;
        let results = SearchResults {
            query: cursor.query().to_string(),
            total_hits: cursor.total_hits(),
            total_pages: cursor.total_pages(),
            hits: hit_rows(&reader, page.start, page.hits),
            duration_ms: start_time.elapsed().as_millis() as u64,
        };
        return output_result(&results, cli_args, out);
    }

    writeln!(out, "Searching for: {}", cursor.query())?;
    writeln!(
        out,
        "{} total matching documents ({} pages)",
        cursor.total_hits(),
        cursor.total_pages()
    )?;

    let display = PageDisplay {
        raw: args.raw,
        interactive: args.interactive,
    };
    page_through(&mut cursor, &reader, display, input, out)
}

/// Turn the clauses of a search into one query.
///
/// Text terms are run through the field's analyzer so they match the indexed
/// form; a term that analyzes into several tokens requires all of them.
/// Several clauses are ANDed together.
pub fn build_query(args: &SearchArgs, schema: &Schema, registry: &AnalyzerRegistry) -> Result<Query> {
    let mut clauses: Vec<Query> = Vec::new();

    for term in &args.terms {
        if schema.kind(&term.field) != Some(FieldKind::Text) {
            clauses.push(TermQuery::new(term.field.clone(), term.term.clone()).into());
            continue;
        }

        let tokens: Vec<String> = registry
            .analyze(&term.field, &term.term)?
            .filter(|token| !token.is_stopped())
            .map(|token| token.text)
            .collect();
        if tokens.is_empty() {
            return Err(PilumError::query(format!(
                "'{}' has no searchable terms in field '{}'",
                term.term, term.field
            )));
        }
        clauses.extend(
            tokens
                .into_iter()
                .map(|token| Query::from(TermQuery::new(term.field.clone(), token))),
        );
    }

    for range in &args.ranges {
        clauses.push(RangeQuery::new(range.field.clone(), range.low, range.high).into());
    }

    match clauses.len() {
        0 => Err(PilumError::invalid_argument(
            "at least one --term or --range clause is required",
        )),
        1 => Ok(clauses.remove(0)),
        _ => {
            let mut boolean = BooleanQuery::new();
            for clause in clauses {
                boolean.add_must(clause);
            }
            Ok(boolean.into())
        }
    }
}

/// How pages are printed.
#[derive(Debug, Clone, Copy)]
pub struct PageDisplay {
    /// Print `doc=<id> score=<s>` lines only.
    pub raw: bool,
    /// Prompt for navigation after each page.
    pub interactive: bool,
}

/// Print pages of `cursor`, reading navigation commands from `input` when
/// interactive.
///
/// Commands are `n` (next), `p` (previous), `q` (quit) and a page number.
/// When a page runs past the collected hits the user is asked whether to
/// collect more; answering `n` ends the session.
pub fn page_through<R: BufRead, W: Write>(
    cursor: &mut PagingCursor,
    reader: &IndexReader,
    display: PageDisplay,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    loop {
        if cursor.needs_more() {
            writeln!(
                out,
                "Only results 1 - {} of {} total matching documents collected.",
                cursor.buffered(),
                cursor.total_hits()
            )?;
            if !display.interactive {
                cursor.decline_more()?;
                break;
            }
            write!(out, "Collect more (y/n) ? ")?;
            out.flush()?;
            match read_command(input)? {
                Some(answer) if !answer.starts_with('n') => cursor.fetch_all()?,
                _ => {
                    cursor.decline_more()?;
                    break;
                }
            }
        }

        let page = cursor.page()?;
        for row in hit_rows(reader, page.start, page.hits) {
            row.write_human(out, display.raw)?;
        }
        if !display.interactive || page.end == 0 {
            break;
        }

        if !prompt_navigation(cursor, input, out)? {
            cursor.quit();
            break;
        }
    }
    Ok(())
}

/// Ask for the next navigation command until one applies. Returns `false` to quit.
fn prompt_navigation<R: BufRead, W: Write>(
    cursor: &mut PagingCursor,
    input: &mut R,
    out: &mut W,
) -> Result<bool> {
    loop {
        let mut options = Vec::new();
        if cursor.has_previous() {
            options.push("(p)revious page");
        }
        if cursor.has_next() {
            options.push("(n)ext page");
        }
        options.push("(q)uit or enter number to jump to a page");
        writeln!(out, "Press {}.", options.join(", "))?;
        out.flush()?;

        let Some(command) = read_command(input)? else {
            return Ok(false);
        };
        match command.as_str() {
            "" => continue,
            c if c.starts_with('q') => return Ok(false),
            c if c.starts_with('p') => {
                if cursor.previous()? {
                    return Ok(true);
                }
            }
            c if c.starts_with('n') => {
                if cursor.next()? {
                    return Ok(true);
                }
            }
            c => match c.parse::<usize>() {
                Ok(number) => match cursor.jump(number) {
                    Ok(()) => return Ok(true),
                    Err(PilumError::PageOutOfRange { .. }) => writeln!(out, "No such page")?,
                    Err(e) => return Err(e),
                },
                Err(_) => writeln!(out, "Unknown command '{c}'")?,
            },
        }
    }
}

/// Read one trimmed, lowercased line; `None` at end of input.
fn read_command<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_lowercase()))
}

fn hit_rows(reader: &IndexReader, start: usize, hits: &[Hit]) -> Vec<HitRow> {
    hits.iter()
        .enumerate()
        .map(|(offset, hit)| {
            let document = reader.document(hit.doc_id);
            HitRow::new(start + offset + 1, hit.doc_id, hit.score, document.as_ref())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::schema::FieldOption;
    use clap::Parser;
    use std::io::Cursor;

    fn search_args(argv: &[&str]) -> SearchArgs {
        let mut full = vec!["pilum", "search", "idx"];
        full.extend_from_slice(argv);
        match PilumArgs::parse_from(full).command {
            Command::Search(search) => search,
            Command::Index(_) => panic!("expected search command"),
        }
    }

    fn schema() -> Schema {
        Schema::new()
            .with_field("title", FieldOption::text().stored(true))
            .unwrap()
            .with_field("tag", FieldOption::keyword())
            .unwrap()
            .with_field("price", FieldOption::numeric_point())
            .unwrap()
    }

    /// An index of 23 documents, all tagged `all`, priced 0..23.
    fn paged_index() -> Index {
        let index = Index::in_memory(schema()).unwrap();
        let writer = index.writer().unwrap();
        for i in 0..23 {
            let doc = Document::builder(Arc::clone(index.schema()))
                .add_text("title", format!("book {i}"))
                .add_keyword("tag", "all")
                .add_numeric("price", i as f64)
                .build()
                .unwrap();
            writer.add_document(doc).unwrap();
        }
        writer.close().unwrap();
        index
    }

    fn cursor(index: &Index, hits_per_page: usize, initial_pages: usize) -> PagingCursor {
        let config = PagingConfig {
            hits_per_page,
            initial_pages,
        };
        index
            .reader()
            .searcher()
            .paginate(
                TermQuery::new("tag", "all").into(),
                Arc::new(ConstantScorer::default()),
                config,
            )
            .unwrap()
    }

    fn run_pages(cursor: &mut PagingCursor, index: &Index, raw: bool, input: &str) -> String {
        let mut input = Cursor::new(input.as_bytes().to_vec());
        let mut out = Vec::new();
        let display = PageDisplay {
            raw,
            interactive: true,
        };
        page_through(cursor, &index.reader(), display, &mut input, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_build_query_analyzes_text_terms() {
        let registry = AnalyzerRegistry::default();
        let schema = schema();

        let query = build_query(&search_args(&["-t", "title=Rust"]), &schema, &registry).unwrap();
        assert_eq!(query, Query::from(TermQuery::new("title", "rust")));

        let query = build_query(&search_args(&["-t", "tag=Rust"]), &schema, &registry).unwrap();
        assert_eq!(query, Query::from(TermQuery::new("tag", "Rust")));

        let query = build_query(
            &search_args(&["-t", "title=The Rust Book", "-r", "price=100..300"]),
            &schema,
            &registry,
        )
        .unwrap();
        assert_eq!(query.to_string(), "+title:rust +title:book +price:[100 TO 300]");
    }

    #[test]
    fn test_build_query_errors() {
        let registry = AnalyzerRegistry::default();
        let schema = schema();

        assert!(build_query(&search_args(&[]), &schema, &registry).is_err());
        assert!(build_query(&search_args(&["-t", "title=the"]), &schema, &registry).is_err());
    }

    #[test]
    fn test_raw_pages_with_navigation() {
        let index = paged_index();
        let mut cursor = cursor(&index, 10, 5);

        let output = run_pages(&mut cursor, &index, true, "n\nn\np\nq\n");
        let lines: Vec<&str> = output
            .lines()
            .filter(|line| line.starts_with("doc="))
            .collect();
        // Pages 1, 2, 3 and 2 again.
        assert_eq!(lines.len(), 10 + 10 + 3 + 10);
        assert_eq!(lines[0], "doc=0 score=1");
        assert_eq!(lines[20], "doc=20 score=1");
        assert_eq!(cursor.state(), CursorState::Quit);
    }

    #[test]
    fn test_jump_out_of_range() {
        let index = paged_index();
        let mut cursor = cursor(&index, 10, 5);

        let output = run_pages(&mut cursor, &index, true, "4\n3\nq\n");
        assert!(output.contains("No such page"));
        assert!(output.contains("doc=22 score=1"));
    }

    #[test]
    fn test_collect_more_prompt() {
        let index = paged_index();

        let mut cursor = cursor(&index, 10, 1);
        let output = run_pages(&mut cursor, &index, true, "n\ny\nq\n");
        assert!(output.contains("Only results 1 - 10 of 23 total matching documents collected."));
        assert!(output.contains("doc=19 score=1"));
        assert_eq!(cursor.buffered(), 23);

        let mut cursor = self::cursor(&index, 10, 1);
        let output = run_pages(&mut cursor, &index, true, "n\nn\n");
        assert!(!output.contains("doc=10 score=1"));
        assert_eq!(cursor.state(), CursorState::Exhausted);
    }

    #[test]
    fn test_non_interactive_prints_first_page() {
        let index = paged_index();
        let mut cursor = cursor(&index, 10, 5);
        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();
        let display = PageDisplay {
            raw: false,
            interactive: false,
        };
        page_through(&mut cursor, &index.reader(), display, &mut input, &mut out).unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.starts_with("1. doc=0 score=1.0000\n"));
        assert!(output.contains("10. doc=9"));
        assert!(!output.contains("11. doc=10"));
        assert!(output.contains("   title: book 0\n"));
    }
}
