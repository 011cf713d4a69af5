//! Human-readable text output

use colored::Colorize;
use radiofind_core::{Candidate, ProbeResult, ResolveResponse};

/// Print a resolution response.
pub fn print_response(response: &ResolveResponse) {
    match response {
        ResolveResponse::Found {
            url, source, name, ..
        } => {
            let label = if name.is_empty() { "stream" } else { name.as_str() };
            println!("{} {}", "✓".green(), label.bold());
            println!("  {} {}", "url:".bright_black(), url);
            println!("  {} {}", "source:".bright_black(), source);
        },
        ResolveResponse::NotFound {
            reason, tried, name, ..
        } => {
            let label = if name.is_empty() { "stream" } else { name.as_str() };
            println!("{} {} ({})", "✗".red(), label.bold(), reason.yellow());
            if tried.is_empty() {
                println!("  no usable candidates");
            } else {
                println!("  tried {} URL(s):", tried.len());
                for url in tried {
                    println!("    {}", url.bright_black());
                }
            }
        },
        ResolveResponse::Fault { error, .. } => {
            println!("{} {}", "error:".red().bold(), error);
        },
    }
}

/// Print a candidate list, one line per candidate.
pub fn print_candidates(candidates: &[Candidate]) {
    if candidates.is_empty() {
        println!("No candidates. Pass --homepage and/or --stream with an http(s) URL.");
        return;
    }
    for (idx, candidate) in candidates.iter().enumerate() {
        println!(
            "{:>3}. [tier {}] {:<15} {}",
            idx + 1,
            candidate.tier.rank(),
            candidate.kind.to_string().cyan(),
            candidate.url
        );
    }
}

/// Print a single probe verdict.
pub fn print_probe(url: &str, result: &ProbeResult) {
    if result.ok {
        let content_type = if result.content_type.is_empty() {
            "unknown content type"
        } else {
            result.content_type.as_str()
        };
        println!("{} {} ({})", "✓".green(), url, content_type.bright_black());
    } else {
        println!("{} {} (not a stream)", "✗".red(), url);
    }
}
