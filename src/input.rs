use crate::{Element, Error, Result};

/// Parse a literal list of merge pairs such as `(1,2), (1,3), (4,3)`.
///
/// Text outside of parentheses is ignored. Fails if a parenthesized group is
/// not a pair of integers, or if no pair is found at all.
pub fn parse_pairs(input: &str) -> Result<Vec<(Element, Element)>> {
    let mut pairs = vec![];
    let mut rest = input;
    while let Some(open) = rest.find('(') {
        let after = &rest[open + 1..];
        let close = after
            .find(')')
            .ok_or_else(|| Error::Parse(format!("unclosed pair: ({}", after.trim_end())))?;
        pairs.push(parse_pair(&after[..close])?);
        rest = &after[close + 1..];
    }
    if pairs.is_empty() {
        return Err(Error::NoPairs);
    }
    Ok(pairs)
}

/// Parse the inside of a pair, `p,q`.
pub(crate) fn parse_pair(inner: &str) -> Result<(Element, Element)> {
    let malformed = || Error::Parse(format!("invalid pair: ({inner})"));
    let (p, q) = inner.split_once(',').ok_or_else(malformed)?;
    let p = p.trim().parse().map_err(|_| malformed())?;
    let q = q.trim().parse().map_err(|_| malformed())?;
    Ok((p, q))
}
