//! Shared fixtures for redeemly-core integration tests.
#![allow(dead_code, clippy::expect_used)]

use std::collections::VecDeque;
use std::path::PathBuf;

use calamine::{Reader, Xlsx, open_workbook};
use redeemly_core::{CoreError, IntegerPrompt, LedgerStore, NoticeKind, Operator};
use tempfile::TempDir;

/// Operator double that replays scripted answers and records what it was asked.
#[derive(Debug, Default)]
pub struct ScriptedOperator {
    pub limit_answers: VecDeque<Option<u32>>,
    pub confirm_answers: VecDeque<bool>,
    pub prompts: Vec<IntegerPrompt>,
    pub confirmations: Vec<String>,
    pub notices: Vec<(NoticeKind, String)>,
}

impl ScriptedOperator {
    pub fn answering_limits(answers: impl IntoIterator<Item = Option<u32>>) -> Self {
        Self {
            limit_answers: answers.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn answering_confirms(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            confirm_answers: answers.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn notice_titles(&self) -> Vec<&str> {
        self.notices.iter().map(|(_, title)| title.as_str()).collect()
    }
}

impl Operator for ScriptedOperator {
    fn prompt_integer(&mut self, prompt: &IntegerPrompt) -> Result<Option<u32>, CoreError> {
        self.prompts.push(prompt.clone());
        Ok(self
            .limit_answers
            .pop_front()
            .expect("unexpected limit prompt"))
    }

    fn notify(&mut self, kind: NoticeKind, title: &str, _message: &str) {
        self.notices.push((kind, title.to_owned()));
    }

    fn confirm(&mut self, title: &str, _message: &str) -> Result<bool, CoreError> {
        self.confirmations.push(title.to_owned());
        Ok(self
            .confirm_answers
            .pop_front()
            .expect("unexpected confirmation"))
    }
}

/// A fresh, initialized ledger in its own temp directory.
pub fn temp_ledger() -> (TempDir, LedgerStore) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = LedgerStore::new(dir.path().join("data.xlsx"));
    store.ensure_initialized().expect("initialize ledger");
    (dir, store)
}

pub fn ledger_path(dir: &TempDir) -> PathBuf {
    dir.path().join("data.xlsx")
}

/// Raw cell text of the first sheet, row by row.
pub fn raw_rows(store: &LedgerStore) -> Vec<Vec<String>> {
    let mut book = open_workbook::<Xlsx<_>, _>(store.path()).expect("open workbook");
    let name = book.sheet_names().first().cloned().expect("first sheet");
    let range = book.worksheet_range(&name).expect("read sheet");
    range
        .rows()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect()
}
