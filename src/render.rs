//! Fixed-width table rendering of extracted routes.

use std::fmt::Write;

use crate::route::ApiRoute;

/// Column widths for `render_table_with`. The comment column is unpadded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    pub method_width: usize,
    pub verb_width: usize,
    pub path_width: usize,
    pub rule_width: usize,
}

impl Default for TableLayout {
    fn default() -> Self {
        TableLayout {
            method_width: 20,
            verb_width: 6,
            path_width: 30,
            rule_width: 80,
        }
    }
}

/// Render routes as `RPC Method | HTTP | Path | Comment` rows.
pub fn render_table(routes: &[ApiRoute]) -> String {
    render_table_with(routes, &TableLayout::default())
}

pub fn render_table_with(routes: &[ApiRoute], layout: &TableLayout) -> String {
    let mut out = String::new();
    push_row(&mut out, layout, "RPC Method", "HTTP", "Path", "Comment");
    out.push_str(&"-".repeat(layout.rule_width));
    out.push('\n');
    for route in routes {
        push_row(
            &mut out,
            layout,
            &route.method_name,
            route.http_verb(),
            &route.path,
            &route.comment,
        );
    }
    out
}

fn push_row(out: &mut String, layout: &TableLayout, method: &str, verb: &str, path: &str, comment: &str) {
    // Writing to a String cannot fail.
    let _ = writeln!(
        out,
        "{:<mw$} | {:<vw$} | {:<pw$} | {}",
        method,
        verb,
        path,
        comment,
        mw = layout.method_width,
        vw = layout.verb_width,
        pw = layout.path_width,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::HttpVerb;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_table() {
        let routes = vec![
            ApiRoute {
                service_name: "HelloService".into(),
                method_name: "SayHello".into(),
                verb: Some(HttpVerb::Post),
                path: "/v1/hello".into(),
                comment: "greet".into(),
            },
            ApiRoute {
                service_name: "HelloService".into(),
                method_name: "Ping".into(),
                verb: None,
                path: String::new(),
                comment: String::new(),
            },
        ];
        let expected = format!(
            "{}\n{}\n{}\n{}\n",
            "RPC Method           | HTTP   | Path                           | Comment",
            "-".repeat(80),
            "SayHello             | POST   | /v1/hello                      | greet",
            "Ping                 |        |                                | ",
        );
        assert_eq!(render_table(&routes), expected);
    }

    #[test]
    fn test_custom_layout() {
        let layout = TableLayout {
            method_width: 4,
            verb_width: 4,
            path_width: 2,
            rule_width: 3,
        };
        let routes = vec![ApiRoute {
            service_name: "S".into(),
            method_name: "LongName".into(),
            verb: Some(HttpVerb::Get),
            path: "/x".into(),
            comment: "c".into(),
        }];
        assert_eq!(
            render_table_with(&routes, &layout),
            "RPC Method | HTTP | Path | Comment\n---\nLongName | GET  | /x | c\n"
        );
    }
}
