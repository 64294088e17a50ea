// src/analyze/login_form.rs
// =============================================================================
// Detects whether the page contains a login form.
//
// A <form> counts as a login form when it has all three of:
// - a username field: <input type="text"> or <input type="email">
// - a password field: <input type="password">
// - a submit control: <button type="submit"> or <input type="submit">
//
// Rust concepts:
// - Closures: The `any(|form| ...)` check runs once per <form>
// =============================================================================

use super::result::{AnalysisError, Contribution};
use super::{Analyzer, CancellationToken, Document, Stage};
use futures::future::{self, BoxFuture, FutureExt};
use scraper::{ElementRef, Html, Selector};
use std::time::Instant;

/// true when at least one form on the page looks like a login form
pub fn has_login_form(html: &str) -> bool {
    contains_login_form(&Html::parse_document(html))
}

fn contains_login_form(document: &Html) -> bool {
    // These selectors are constants, so parsing them cannot fail at runtime
    let form = Selector::parse("form").expect("valid form selector");
    let username = Selector::parse(r#"input[type="text"], input[type="email"]"#)
        .expect("valid username selector");
    let password = Selector::parse(r#"input[type="password"]"#).expect("valid password selector");
    let submit = Selector::parse(r#"button[type="submit"], input[type="submit"]"#)
        .expect("valid submit selector");

    document.select(&form).any(|form| {
        contains(&form, &username) && contains(&form, &password) && contains(&form, &submit)
    })
}

fn contains(form: &ElementRef, selector: &Selector) -> bool {
    form.select(selector).next().is_some()
}

/// Analyzer writing the `hasLogin` field
#[derive(Debug, Default)]
pub struct LoginFormAnalyzer;

impl Analyzer for LoginFormAnalyzer {
    fn stage(&self) -> Stage {
        Stage::LoginForm
    }

    fn analyze<'a>(
        &'a self,
        document: &'a Document,
        _cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Contribution, AnalysisError>> {
        let started = Instant::now();
        let has_login = has_login_form(document.content());
        ::log::debug!(
            "Login form analyzer completed in {:?} (login form: {})",
            started.elapsed(),
            has_login
        );
        future::ready(Ok(Contribution::LoginForm(has_login))).boxed()
    }
}
