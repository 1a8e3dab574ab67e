//! Page-level error boundary.
//!
//! [`ErrorHandler`] collects [`ErrorReport`]s sent by descendants through the
//! [`ErrorSink`] context, and catches errors thrown while rendering. Once
//! anything is recorded the children are replaced by the list of messages,
//! newest first. There is no way back: the subtree stays degraded until the
//! page is remounted.

use api::{ApiError, ErrorReport};
use dioxus::prelude::*;

/// Handle descendants use to report errors to the nearest [`ErrorHandler`].
#[derive(Clone, Copy, PartialEq)]
pub struct ErrorSink {
    errors: Signal<Vec<String>>,
}

impl ErrorSink {
    pub fn report(self, report: ErrorReport) {
        tracing::error!("{report}");
        let mut errors = self.errors;
        errors.write().insert(0, report.to_string());
    }

    /// Report `err` under `context`, unless the request was aborted.
    pub fn fail(self, err: &ApiError, context: &str) {
        if !err.is_aborted() {
            self.report(err.report(context));
        }
    }
}

pub fn use_error_sink() -> ErrorSink {
    use_context::<ErrorSink>()
}

#[component]
pub fn ErrorHandler(children: Element) -> Element {
    let errors = use_signal(Vec::<String>::new);
    use_context_provider(|| ErrorSink { errors });

    if !errors.read().is_empty() {
        return rsx! {
            ErrorList { messages: errors() }
        };
    }

    rsx! {
        ErrorBoundary {
            handle_error: move |error: ErrorContext| {
                tracing::error!("Render error: {error:?}");
                let mut messages = vec!["Unknown error".to_string()];
                messages.extend(errors.peek().iter().cloned());
                rsx! {
                    ErrorList { messages }
                }
            },
            {children}
        }
    }
}

#[component]
pub fn ErrorList(messages: Vec<String>) -> Element {
    rsx! {
        div {
            class: "rounded border border-red-300 bg-red-50 p-4 text-red-800",
            h3 { class: "m-0 mb-2 text-base font-semibold", "Something went wrong" }
            ul {
                class: "m-0 pl-5",
                for (i, message) in messages.iter().enumerate() {
                    li { key: "{i}", "{message}" }
                }
            }
        }
    }
}
