//! Output formatting for CLI commands.

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;

use crate::cli::args::{OutputFormat, PilumArgs};
use crate::document::Document;
use crate::error::Result;

/// Result of an `index` run.
#[derive(Debug, Serialize)]
pub struct IndexingResult {
    pub index_path: String,
    pub documents_indexed: u64,
    pub documents_skipped: u64,
    pub commits: u64,
    pub generation: u64,
    pub total_documents: u64,
    pub duration_ms: u64,
}

/// Result of a non-interactive `search` run.
#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub total_hits: u64,
    pub total_pages: usize,
    pub hits: Vec<HitRow>,
    pub duration_ms: u64,
}

/// One ranked hit with its stored fields.
#[derive(Debug, Serialize)]
pub struct HitRow {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub doc_id: u64,
    pub score: f64,
    pub fields: BTreeMap<String, Vec<String>>,
}

impl HitRow {
    pub fn new(rank: usize, doc_id: u64, score: f64, document: Option<&Document>) -> Self {
        let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();
        if let Some(document) = document {
            for field in document.fields() {
                fields
                    .entry(field.name.clone())
                    .or_default()
                    .push(field.value.to_string());
            }
        }
        HitRow {
            rank,
            doc_id,
            score,
            fields,
        }
    }

    /// Write the hit the way search results are listed.
    ///
    /// Raw mode prints only `doc=<id> score=<score>`.
    pub fn write_human<W: Write>(&self, out: &mut W, raw: bool) -> Result<()> {
        if raw {
            writeln!(out, "doc={} score={}", self.doc_id, self.score)?;
            return Ok(());
        }

        writeln!(out, "{}. doc={} score={:.4}", self.rank, self.doc_id, self.score)?;
        if self.fields.is_empty() {
            writeln!(out, "   No stored fields for this document")?;
        }
        for (name, values) in &self.fields {
            writeln!(out, "   {name}: {}", values.join(" | "))?;
        }
        Ok(())
    }
}

/// Results that know how to print themselves for humans.
pub trait HumanOutput {
    fn write_human<W: Write>(&self, out: &mut W, args: &PilumArgs) -> Result<()>;
}

impl HumanOutput for IndexingResult {
    fn write_human<W: Write>(&self, out: &mut W, args: &PilumArgs) -> Result<()> {
        writeln!(
            out,
            "Indexed {} documents into {} in {} ms",
            self.documents_indexed, self.index_path, self.duration_ms
        )?;
        if self.documents_skipped > 0 {
            writeln!(out, "Skipped {} invalid documents", self.documents_skipped)?;
        }
        if args.verbosity() > 1 {
            writeln!(out, "Commits: {}", self.commits)?;
            writeln!(out, "Generation: {}", self.generation)?;
            writeln!(out, "Total documents: {}", self.total_documents)?;
        }
        Ok(())
    }
}

impl HumanOutput for SearchResults {
    fn write_human<W: Write>(&self, out: &mut W, _args: &PilumArgs) -> Result<()> {
        writeln!(out, "Searching for: {}", self.query)?;
        writeln!(
            out,
            "{} total matching documents ({} pages)",
            self.total_hits, self.total_pages
        )?;
        for hit in &self.hits {
            hit.write_human(out, false)?;
        }
        Ok(())
    }
}

/// Output a result in the format selected on the command line.
pub fn output_result<T, W>(result: &T, args: &PilumArgs, out: &mut W) -> Result<()>
where
    T: Serialize + HumanOutput,
    W: Write,
{
    match args.output_format {
        OutputFormat::Human => result.write_human(out, args),
        OutputFormat::Json => output_json(result, args, out),
    }
}

fn output_json<T: Serialize, W: Write>(result: &T, args: &PilumArgs, out: &mut W) -> Result<()> {
    if args.pretty {
        serde_json::to_writer_pretty(&mut *out, result)?;
    } else {
        serde_json::to_writer(&mut *out, result)?;
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentField, FieldValue};
    use clap::Parser;

    fn hit_row() -> HitRow {
        let document = Document::from_fields(vec![
            DocumentField {
                name: "title".to_string(),
                value: FieldValue::Text("Rust book".to_string()),
                stored: true,
            },
            DocumentField {
                name: "price".to_string(),
                value: FieldValue::Numeric(102.5),
                stored: true,
            },
        ]);
        HitRow::new(1, 7, 1.5, Some(&document))
    }

    #[test]
    fn test_human_hit() {
        let mut out = Vec::new();
        hit_row().write_human(&mut out, false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("1. doc=7 score=1.5000\n"));
        assert!(text.contains("   price: 102.5\n"));
        assert!(text.contains("   title: Rust book\n"));

        let mut out = Vec::new();
        hit_row().write_human(&mut out, true).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "doc=7 score=1.5\n");
    }

    #[test]
    fn test_missing_document() {
        let mut out = Vec::new();
        HitRow::new(2, 3, 0.5, None)
            .write_human(&mut out, false)
            .unwrap();
        assert!(
            String::from_utf8(out)
                .unwrap()
                .contains("No stored fields for this document")
        );
    }

    #[test]
    fn test_json_output() {
        let args = PilumArgs::parse_from(["pilum", "--format", "json", "search", "idx"]);
        let results = SearchResults {
            query: "title:rust".to_string(),
            total_hits: 1,
            total_pages: 1,
            hits: vec![hit_row()],
            duration_ms: 0,
        };

        let mut out = Vec::new();
        output_result(&results, &args, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["total_hits"], 1);
        assert_eq!(value["hits"][0]["doc_id"], 7);
        assert_eq!(value["hits"][0]["fields"]["title"][0], "Rust book");
    }
}
