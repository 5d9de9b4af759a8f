// End-to-end use of the Tokenizer and Module contracts over the token store

use anyhow::Result;
use llppipeline::{
    get_documents, get_sentences, validate_tokens, Field, Module, ModuleConfig, Token, TokenError,
    Tokenizer,
};
use std::io::{BufRead, Read};

/// One document per call; sentences end at `.`
struct PeriodTokenizer;

impl Tokenizer for PeriodTokenizer {
    fn name(&self) -> &str {
        "period_tokenizer"
    }

    fn tokenize(&self, source: &mut dyn BufRead, name: &str) -> Result<Vec<Token>> {
        let mut text = String::new();
        source.read_to_string(&mut text)?;

        let mut tokens = Vec::new();
        let mut sentence = 0i64;
        for (id, raw) in text.split_whitespace().enumerate() {
            let (word, ends_sentence) = match raw.strip_suffix('.') {
                Some(word) => (word, true),
                None => (raw, false),
            };
            let mut token = Token::new();
            token.set_field(Field::Doc, self.name(), name);
            token.set_field(Field::Id, self.name(), id as i64);
            token.set_field(Field::Word, self.name(), word);
            token.set_field(Field::Sentence, self.name(), sentence);
            tokens.push(token);
            if ends_sentence {
                sentence += 1;
            }
        }
        Ok(tokens)
    }
}

/// Tags capitalized words as PROPN, everything else with `default_tag`
struct CaseTagger {
    name: &'static str,
}

impl Module for CaseTagger {
    fn name(&self) -> &str {
        self.name
    }

    fn process(&self, mut tokens: Vec<Token>, config: &ModuleConfig) -> Result<Vec<Token>> {
        let default_tag = config.get_str("default_tag")?.unwrap_or("X").to_string();
        for token in &mut tokens {
            let capitalized = token.word()?.starts_with(char::is_uppercase);
            let tag = if capitalized { "PROPN".to_string() } else { default_tag.clone() };
            token.set_field(Field::Pos, self.name, tag);
        }
        Ok(tokens)
    }
}

fn run(tokens: Vec<Token>, modules: &[(&dyn Module, ModuleConfig)]) -> Result<Vec<Token>> {
    modules
        .iter()
        .try_fold(tokens, |tokens, (module, config)| module.process(tokens, config))
}

#[test]
fn test_tokenizer_then_module() {
    let tokens = PeriodTokenizer
        .tokenize_str("Alice reads. Bob writes code.", "story.txt")
        .unwrap();
    validate_tokens(&tokens).unwrap();

    let tagger = CaseTagger { name: "case_tagger" };
    let steps: [(&dyn Module, ModuleConfig); 1] =
        [(&tagger, ModuleConfig::new().with("default_tag", "NOUN"))];
    let tokens = run(tokens, &steps).unwrap();

    let tags: Vec<&str> = tokens.iter().map(|t| t.pos().unwrap()).collect();
    assert_eq!(tags, vec!["PROPN", "NOUN", "PROPN", "NOUN", "NOUN"]);

    let sentences = get_sentences(tokens).collect_runs().unwrap();
    let words: Vec<Vec<&str>> = sentences
        .iter()
        .map(|s| s.iter().map(|t| t.word().unwrap()).collect())
        .collect();
    assert_eq!(words, vec![vec!["Alice", "reads"], vec!["Bob", "writes", "code"]]);
}

#[test]
fn test_two_taggers_need_disambiguation() {
    let tokens = PeriodTokenizer.tokenize_str("Carol sings.", "song.txt").unwrap();
    let first = CaseTagger { name: "tagger_a" };
    let second = CaseTagger { name: "tagger_b" };

    let steps: [(&dyn Module, ModuleConfig); 2] = [
        (&first, ModuleConfig::new().with("default_tag", "VERB")),
        (&second, ModuleConfig::new()),
    ];
    let tokens = run(tokens, &steps).unwrap();

    let sings = &tokens[1];
    assert_eq!(
        sings.pos(),
        Err(TokenError::AmbiguousField {
            field: Field::Pos,
            modules: vec!["tagger_a".to_string(), "tagger_b".to_string()],
        })
    );
    assert_eq!(sings.get_field(Field::Pos, Some("tagger_a")).unwrap().as_str(), Some("VERB"));
    assert_eq!(sings.get_field(Field::Pos, Some("tagger_b")).unwrap().as_str(), Some("X"));

    // the tokenizer's fields are still unambiguous
    assert_eq!(sings.word().unwrap(), "sings");
}

#[test]
fn test_fields_cannot_be_assigned_directly() {
    let mut tokens = PeriodTokenizer.tokenize_str("Hi.", "hi.txt").unwrap();
    let token = &mut tokens[0];

    assert_eq!(
        token.set_attr("word", "Bye"),
        Err(TokenError::ImmutableField { field: Field::Word })
    );
    assert_eq!(token.word().unwrap(), "Hi");

    token.set_attr("source_line", 1).unwrap();
    assert_eq!(token.get_attr("source_line").unwrap().as_int(), Some(1));
}

#[test]
fn test_documents_from_several_tokenizer_runs() {
    let mut tokens = PeriodTokenizer.tokenize_str("One. Two.", "a.txt").unwrap();
    tokens.extend(PeriodTokenizer.tokenize_str("Three.", "b.txt").unwrap());

    let documents = get_documents(tokens).collect_runs().unwrap();
    assert_eq!(documents.len(), 2);

    let per_document: Vec<usize> = documents
        .into_iter()
        .map(|doc| get_sentences(doc).iter().count())
        .collect();
    assert_eq!(per_document, vec![2, 1]);
}

#[test]
fn test_module_error_stops_the_run() {
    let tagger = CaseTagger { name: "case_tagger" };
    let steps: [(&dyn Module, ModuleConfig); 1] = [(&tagger, ModuleConfig::new())];
    let err = run(vec![Token::new()], &steps).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<TokenError>(),
        Some(TokenError::FieldNotSet { field: Field::Word, .. })
    ));
}
