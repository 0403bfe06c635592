//! Maps a free-form fund-type string to the domain guidance paragraph the
//! prompt compiler embeds. Matching is case-insensitive substring matching
//! against an ordered rule table; the first matching rule wins.

type Rule = (&'static [&'static str], &'static str);

const RULES: &[Rule] = &[
    (
        &["hedge", "long-short", "long/short"],
        "This is a hedge fund. Frame performance in terms of risk-adjusted returns: \
         discuss gross and net exposure, how the short book contributed, and how the \
         fund protected capital relative to the benchmark in drawdowns.",
    ),
    (
        &["private equity", "buyout"],
        "This is a private equity fund. Frame the letter around portfolio companies and \
         value creation: operational improvements, add-on acquisitions, multiple \
         expansion, and realization activity rather than mark-to-market moves.",
    ),
    (
        &["venture", "vc", "seed", "early-stage"],
        "This is a venture capital fund. Frame the letter around portfolio-company \
         milestones: follow-on financings, revenue inflections, key hires, and \
         markups or markdowns, noting that interim valuations are indicative.",
    ),
    (
        &["real estate", "reit", "property"],
        "This is a real estate fund. Frame the letter around occupancy, net operating \
         income, lease activity, and cap-rate movements across the portfolio.",
    ),
    (
        &["credit", "debt", "lending"],
        "This is a credit fund. Frame the letter around portfolio yield, spread \
         movements, default and recovery rates, and the credit quality mix of the book.",
    ),
    (
        &["infrastructure", "infra"],
        "This is an infrastructure fund. Frame the letter around contracted cash flows, \
         availability and utilization of the underlying assets, and inflation linkage \
         of the revenue base.",
    ),
];

/// Pure and total: returns a guidance paragraph for any input, falling back
/// to a generic institutional-LP framing parameterized by the literal string.
pub fn fund_type_guidance(fund_type: &str) -> String {
    let normalized = fund_type.to_lowercase();
    for (keywords, guidance) in RULES {
        if keywords.iter().any(|keyword| normalized.contains(keyword)) {
            return (*guidance).to_string();
        }
    }

    format!(
        "The fund is described as \"{}\". Write for an institutional limited-partner \
         audience: focus on period performance drivers, portfolio positioning, and \
         outlook, in the conventions of that strategy.",
        fund_type.trim()
    )
}
