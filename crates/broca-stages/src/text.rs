//! Stages de texto: `html -> docs -> tokens -> vecs`.

use broca_core::{Shape, Signature, StageError, TypedStage};
use sha2::{Digest, Sha256};

use crate::tags::{docs, html, tokens, vecs};

/// Extrae el texto de documentos HTML y decodifica entidades básicas.
#[derive(Debug, Clone)]
pub struct HtmlCleaner {
    signature: Signature,
}

impl Default for HtmlCleaner {
    fn default() -> Self {
        Self {
            signature: Signature::new(module_path!(), "HtmlCleaner"),
        }
    }
}

impl TypedStage for HtmlCleaner {
    type Input = Vec<String>;
    type Output = Vec<String>;
    const SOURCE: &'static str = "html_cleaner/v1";

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn input(&self) -> Shape {
        html()
    }

    fn output(&self) -> Shape {
        docs()
    }

    fn run_typed(&self, input: Vec<String>) -> Result<Vec<String>, StageError> {
        Ok(input.iter().map(|d| strip_html(d)).collect())
    }
}

/// Texto fuera de etiquetas; los fragmentos no vacíos se unen con un espacio.
fn strip_html(doc: &str) -> String {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut in_tag = false;
    for c in doc.chars() {
        match (c, in_tag) {
            ('<', false) => {
                in_tag = true;
                push_chunk(&mut chunks, &current);
                current.clear();
            }
            ('>', true) => in_tag = false,
            (_, true) => {}
            (c, false) => current.push(c),
        }
    }
    push_chunk(&mut chunks, &current);
    chunks.join(" ")
}

fn push_chunk(chunks: &mut Vec<String>, raw: &str) {
    let text = decode_entities(raw.trim());
    if !text.is_empty() {
        chunks.push(text);
    }
}

fn decode_entities(s: &str) -> String {
    // `&amp;` al final para no decodificar dos veces.
    [
        ("&#39;", "'"),
        ("&quot;", "\""),
        ("&gt;", ">"),
        ("&lt;", "<"),
        ("&amp;", "&"),
    ]
    .iter()
    .fold(s.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// Limpieza básica de documentos.
#[derive(Debug, Clone)]
pub struct Cleaner {
    remove_urls: bool,
    lowercase: bool,
    remove_possessors: bool,
    remove_punctuation: bool,
    signature: Signature,
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new(true, true, true, true)
    }
}

impl Cleaner {
    pub fn new(
        remove_urls: bool,
        lowercase: bool,
        remove_possessors: bool,
        remove_punctuation: bool,
    ) -> Self {
        let mut signature = Signature::new(module_path!(), "Cleaner");
        // Sólo los flags distintos del default, como al construir `Cleaner(lowercase=False)`.
        for (key, value, default) in [
            ("remove_urls", remove_urls, true),
            ("lowercase", lowercase, true),
            ("remove_possessors", remove_possessors, true),
            ("remove_punctuation", remove_punctuation, true),
        ] {
            if value != default {
                signature = signature.kwarg(key, value);
            }
        }
        Self {
            remove_urls,
            lowercase,
            remove_possessors,
            remove_punctuation,
            signature,
        }
    }

    pub fn keep_case() -> Self {
        Self::new(true, false, true, true)
    }

    pub fn clean(&self, doc: &str) -> String {
        let mut doc = if self.lowercase {
            doc.to_lowercase()
        } else {
            doc.to_string()
        };
        if self.remove_urls {
            doc = strip_urls(&doc);
        }
        if self.remove_possessors {
            doc = doc.replace("'s ", " ");
        }
        if self.remove_punctuation {
            doc = strip_punct(&doc);
        }
        doc.trim().to_string()
    }
}

impl TypedStage for Cleaner {
    type Input = Vec<String>;
    type Output = Vec<String>;
    const SOURCE: &'static str = "cleaner/v1";

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn input(&self) -> Shape {
        docs()
    }

    fn output(&self) -> Shape {
        docs()
    }

    fn run_typed(&self, input: Vec<String>) -> Result<Vec<String>, StageError> {
        Ok(input.iter().map(|d| self.clean(d)).collect())
    }
}

/// Borra desde cada `http://` o `https://` hasta el final de la línea,
/// incluidos los saltos de línea que siguen.
fn strip_urls(doc: &str) -> String {
    let mut out = String::with_capacity(doc.len());
    let mut rest = doc;
    while let Some(start) = find_url(rest) {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let line_end = tail.find(['\r', '\n']).unwrap_or(tail.len());
        rest = tail[line_end..].trim_start_matches(['\r', '\n']);
    }
    out.push_str(rest);
    out
}

fn find_url(s: &str) -> Option<usize> {
    match (s.find("http://"), s.find("https://")) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

// Puntuación ASCII más comillas tipográficas, salvo el guion.
fn is_stripped_punct(c: char) -> bool {
    (c.is_ascii_punctuation() && c != '-') || c == '“' || c == '”'
}

fn strip_punct(doc: &str) -> String {
    doc.chars()
        .filter_map(|c| match c {
            '—' => Some(' '),
            c if is_stripped_punct(c) => None,
            c => Some(c),
        })
        .collect()
}

/// Parte cada documento en tokens por espacios, descartando los más cortos
/// que `min_len`.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    min_len: usize,
    signature: Signature,
}

impl Tokenizer {
    pub fn new(min_len: usize) -> Self {
        Self {
            min_len,
            signature: Signature::new(module_path!(), "Tokenizer").kwarg("min_len", min_len),
        }
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(1)
    }
}

impl TypedStage for Tokenizer {
    type Input = Vec<String>;
    type Output = Vec<Vec<String>>;
    const SOURCE: &'static str = "tokenizer/v1";

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn input(&self) -> Shape {
        docs()
    }

    fn output(&self) -> Shape {
        tokens()
    }

    fn run_typed(&self, input: Vec<String>) -> Result<Vec<Vec<String>>, StageError> {
        Ok(input
            .iter()
            .map(|d| {
                d.split_whitespace()
                    .filter(|t| t.chars().count() >= self.min_len)
                    .map(str::to_string)
                    .collect()
            })
            .collect())
    }
}

/// Bolsa de palabras con hashing: cada token cuenta en el bucket
/// `sha256(token) mod buckets`.
#[derive(Debug, Clone)]
pub struct HashingVectorizer {
    buckets: usize,
    signature: Signature,
}

impl HashingVectorizer {
    pub fn new(buckets: usize) -> Result<Self, StageError> {
        if buckets == 0 {
            return Err(StageError::Configuration(
                "HashingVectorizer needs at least one bucket".into(),
            ));
        }
        Ok(Self {
            buckets,
            signature: Signature::new(module_path!(), "HashingVectorizer")
                .kwarg("buckets", buckets),
        })
    }

    fn bucket(&self, token: &str) -> usize {
        let digest = Sha256::digest(token.as_bytes());
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        (u64::from_be_bytes(head) % self.buckets as u64) as usize
    }
}

impl TypedStage for HashingVectorizer {
    type Input = Vec<Vec<String>>;
    type Output = Vec<Vec<u32>>;
    const SOURCE: &'static str = "hashing_vectorizer/v1";

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn input(&self) -> Shape {
        tokens()
    }

    fn output(&self) -> Shape {
        vecs()
    }

    fn run_typed(&self, input: Vec<Vec<String>>) -> Result<Vec<Vec<u32>>, StageError> {
        Ok(input
            .iter()
            .map(|doc| {
                let mut counts = vec![0u32; self.buckets];
                for token in doc {
                    counts[self.bucket(token)] += 1;
                }
                counts
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use broca_core::Stage;

    #[test]
    fn html_cleaner_keeps_text_only() {
        let out = HtmlCleaner::default()
            .run_typed(vec!["<div>Fish &amp; <b>chips</b></div>".into()])
            .unwrap();
        assert_eq!(out, vec!["Fish & chips".to_string()]);
    }

    #[test]
    fn cleaner_defaults() {
        let c = Cleaner::default();
        assert_eq!(
            c.clean("Cage's hand—the Vast, Empty! see https://example.com/x\nend"),
            "cage hand the vast empty see end"
        );
        assert_eq!(c.clean("well-known “quote”"), "well-known quote");
    }

    #[test]
    fn cleaner_signature_lists_non_default_flags() {
        assert_eq!(Stage::signature(&Cleaner::default()).as_str(), "Cleaner()");
        assert_eq!(
            Stage::signature(&Cleaner::keep_case()).as_str(),
            "Cleaner(lowercase=false)"
        );
        assert_eq!(Cleaner::keep_case().clean("Hello, World"), "Hello World");
    }

    #[test]
    fn tokenizer_drops_short_tokens() {
        let out = Tokenizer::new(3).run_typed(vec!["a big red fox".into()]).unwrap();
        assert_eq!(
            out,
            vec![vec!["big".to_string(), "red".to_string(), "fox".to_string()]]
        );
    }

    #[test]
    fn vectorizer_counts_every_token() {
        let v = HashingVectorizer::new(8).unwrap();
        let out = v
            .run_typed(vec![vec!["ocean".into(), "ocean".into(), "hand".into()]])
            .unwrap();
        assert_eq!(out[0].len(), 8);
        assert_eq!(out[0].iter().sum::<u32>(), 3);
        assert!(out[0][v.bucket("ocean")] >= 2);
    }

    #[test]
    fn vectorizer_needs_buckets() {
        assert!(matches!(HashingVectorizer::new(0), Err(StageError::Configuration(_))));
    }
}
