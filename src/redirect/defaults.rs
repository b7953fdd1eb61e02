//! Built-in redirect table for the documentation site.
//!
//! Served when the configuration file has no `[[redirects]]` entries. Order
//! matters: specific rules sit above the catch-alls that would shadow them.

use crate::config::RedirectRule;

const PERMANENT: bool = true;
const TEMPORARY: bool = false;

const DEFAULT_RULES: &[(&str, &str, bool)] = &[
    ("/guides/cheatsheet/:path*", "/resources/cheatsheets/:path*", PERMANENT),
    ("/guides/ai/:path*", "/ai/:path*", PERMANENT),
    ("/changelog/6_x", "/resources/changelog/6_x", PERMANENT),
    ("/database/:path*", "/reference/:path*", TEMPORARY),
    ("/guides/:path*", "/resources/guides/:path*", TEMPORARY),
    ("/reference/clients/connection", "/reference/connection", TEMPORARY),
    ("/reference/reference/bindings/datetime", "/reference/clients/datetime", TEMPORARY),
    ("/reference/reference/bindings", "/reference/clients", TEMPORARY),
    ("/reference/clients/go/:path*", "https://pkg.go.dev/github.com/geldata/gel-go", TEMPORARY),
    ("/reference/clients/rust/:path*", "https://docs.rs/gel-tokio", TEMPORARY),
    ("/reference/clients/js/delete#delete", "/reference/clients/js/querybuilder", TEMPORARY),
    ("/reference/clients/js/driver", "/reference/clients/js", TEMPORARY),
    ("/reference/clients/js/for", "/reference/clients/js/querybuilder#for", TEMPORARY),
    ("/reference/clients/js/funcops", "/reference/clients/js/querybuilder#functions-and-operators", TEMPORARY),
    ("/reference/clients/js/group", "/reference/clients/js/querybuilder#group", TEMPORARY),
    ("/reference/clients/js/insert", "/reference/clients/js/querybuilder#insert", TEMPORARY),
    ("/reference/clients/js/literals", "/reference/clients/js/querybuilder#types-and-literals", TEMPORARY),
    ("/reference/clients/js/objects", "/reference/clients/js/querybuilder#objects-and-paths", TEMPORARY),
    ("/reference/clients/js/parameters", "/reference/clients/js/querybuilder#parameters", TEMPORARY),
    ("/reference/clients/js/select", "/reference/clients/js/querybuilder#select", TEMPORARY),
    ("/reference/clients/js/types", "/reference/clients/js/querybuilder#types-and-literals", TEMPORARY),
    ("/reference/clients/js/update", "/reference/clients/js/querybuilder#update", TEMPORARY),
    ("/reference/clients/js/with", "/reference/clients/js/querybuilder#with-blocks", TEMPORARY),
    ("/reference/clients/js/reference", "/reference/clients/js/client#client-reference", TEMPORARY),
    ("/reference/reference/connection", "/reference/connection", TEMPORARY),
    ("/reference/reference/dsn", "/reference/connection#dsn", TEMPORARY),
    ("/reference/clients/python/api/asyncio_client", "/reference/clients/python/client#asyncio-client", TEMPORARY),
    ("/reference/clients/python/api/blocking_client", "/reference/clients/python/client#blocking-client", TEMPORARY),
    ("/reference/clients/python/installation", "/reference/clients/python#installation", TEMPORARY),
    ("/reference/clients/python/usage", "/reference/clients/python#basic-usage", TEMPORARY),
    ("/reference/clients/:path*", "/reference/using/clients/:path*", TEMPORARY),
    ("/reference/clients", "/reference/using/clients", TEMPORARY),
    ("/reference/connection", "/reference/using/connection", TEMPORARY),
];

impl RedirectRule {
    /// The built-in documentation redirects, in evaluation order.
    pub fn defaults() -> Vec<RedirectRule> {
        DEFAULT_RULES
            .iter()
            .map(|&(source, destination, permanent)| RedirectRule::new(source, destination, permanent))
            .collect()
    }
}
