use std::net::Ipv4Addr;
use std::sync::OnceLock;

use regex::Regex;

static DOMAIN_SHAPE_RE: OnceLock<Regex> = OnceLock::new();

fn domain_shape_re() -> &'static Regex {
    DOMAIN_SHAPE_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("domain shape regex to compile")
    })
}

/// Syntactic gate only: accepts a dotted-quad IPv4 literal or something
/// shaped like a domain name with an alphabetic TLD. No DNS resolution
/// happens here; membership in the allow-list is checked separately.
///
/// IPv6 literals are not accepted. The probe tools are invoked with their
/// IPv4 defaults, so letting `::1` through would only produce confusing
/// tool errors downstream.
pub fn is_valid_host(host: &str) -> bool {
    if host.parse::<Ipv4Addr>().is_ok() {
        return true;
    }
    domain_shape_re().is_match(host)
}

#[cfg(test)]
mod tests {
    use assertor::assert_that;
    use assertor::BooleanAssertion;

    use super::is_valid_host;

    #[test]
    fn accepts_dotted_quad() {
        assert_that!(is_valid_host("8.8.8.8")).is_true();
        assert_that!(is_valid_host("192.0.2.255")).is_true();
    }

    #[test]
    fn rejects_out_of_range_octets() {
        assert_that!(is_valid_host("999.1.1.1")).is_false();
        assert_that!(is_valid_host("256.0.0.1")).is_false();
    }

    #[test]
    fn accepts_domain_names() {
        assert_that!(is_valid_host("example.com")).is_true();
        assert_that!(is_valid_host("sub.domain.example.org")).is_true();
    }

    #[test]
    fn rejects_non_domains() {
        assert_that!(is_valid_host("not_a_domain")).is_false();
        assert_that!(is_valid_host("")).is_false();
        assert_that!(is_valid_host("host.")).is_false();
        // numeric TLD does not count as a domain, and it's not a full quad
        assert_that!(is_valid_host("8.8.8")).is_false();
    }

    #[test]
    fn rejects_ipv6_literals() {
        assert_that!(is_valid_host("::1")).is_false();
        assert_that!(is_valid_host("2001:db8::1")).is_false();
    }
}
