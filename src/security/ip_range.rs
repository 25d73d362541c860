//! IP address range classification.
//!
//! A public, routable unicast address is the only allowed fetch target; a
//! single positive check blocks RFC 1918 space, loopback, link-local,
//! multicast, carrier-grade NAT, and the reserved/documentation ranges.
//! Classification runs on parsed addresses, so octal/hex/decimal literal
//! tricks are already normalized away by the URL parser or the resolver.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// The range an IP address belongs to.
///
/// Mirrors the taxonomy of standard ipaddr libraries; everything except
/// [`IpRange::Unicast`] is rejected as a fetch target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpRange {
    /// 0.0.0.0/8, `::`
    Unspecified,
    /// 255.255.255.255
    Broadcast,
    /// 224.0.0.0/4, ff00::/8
    Multicast,
    /// 169.254.0.0/16, fe80::/10
    LinkLocal,
    /// 127.0.0.0/8, `::1`
    Loopback,
    /// 100.64.0.0/10
    CarrierGradeNat,
    /// 10.0.0.0/8, 172.16.0.0/12, 192.168.0.0/16
    Private,
    /// fc00::/7
    UniqueLocal,
    /// ::ffff:0:0/96
    Ipv4Mapped,
    /// Documentation, benchmarking, 6to4/Teredo relay, and future-use ranges
    Reserved,
    /// Anything else: publicly routable unicast
    Unicast,
}

/// Classifies an IP address into its range.
pub fn classify(ip: IpAddr) -> IpRange {
    match ip {
        IpAddr::V4(v4) => classify_v4(v4),
        IpAddr::V6(v6) => classify_v6(v6),
    }
}

/// Returns `true` if the address is publicly routable unicast.
pub fn is_public_unicast(ip: IpAddr) -> bool {
    classify(ip) == IpRange::Unicast
}

fn classify_v4(ip: Ipv4Addr) -> IpRange {
    let o = ip.octets();
    // 255.255.255.255 before the 240.0.0.0/4 reserved check
    if o == [255, 255, 255, 255] {
        return IpRange::Broadcast;
    }
    // This-network 0.0.0.0/8
    if o[0] == 0 {
        return IpRange::Unspecified;
    }
    // Loopback 127.0.0.0/8
    if o[0] == 127 {
        return IpRange::Loopback;
    }
    // Link-local 169.254.0.0/16
    if o[0] == 169 && o[1] == 254 {
        return IpRange::LinkLocal;
    }
    // Multicast 224.0.0.0/4
    if (224..=239).contains(&o[0]) {
        return IpRange::Multicast;
    }
    // Carrier-grade NAT 100.64.0.0/10
    if o[0] == 100 && (64..=127).contains(&o[1]) {
        return IpRange::CarrierGradeNat;
    }
    // Private 10.0.0.0/8
    if o[0] == 10 {
        return IpRange::Private;
    }
    // Private 172.16.0.0/12
    if o[0] == 172 && (16..=31).contains(&o[1]) {
        return IpRange::Private;
    }
    // Private 192.168.0.0/16
    if o[0] == 192 && o[1] == 168 {
        return IpRange::Private;
    }
    // IETF protocol assignments 192.0.0.0/24, documentation 192.0.2.0/24,
    // 6to4 relay anycast 192.88.99.0/24
    if o[0] == 192 && ((o[1] == 0 && (o[2] == 0 || o[2] == 2)) || (o[1] == 88 && o[2] == 99)) {
        return IpRange::Reserved;
    }
    // Benchmarking 198.18.0.0/15, documentation 198.51.100.0/24
    if o[0] == 198 && ((o[1] == 18 || o[1] == 19) || (o[1] == 51 && o[2] == 100)) {
        return IpRange::Reserved;
    }
    // Documentation 203.0.113.0/24
    if o[0] == 203 && o[1] == 0 && o[2] == 113 {
        return IpRange::Reserved;
    }
    // Future use 240.0.0.0/4
    if o[0] >= 240 {
        return IpRange::Reserved;
    }
    IpRange::Unicast
}

fn classify_v6(ip: Ipv6Addr) -> IpRange {
    let s = ip.segments();
    // :: unspecified
    if s == [0; 8] {
        return IpRange::Unspecified;
    }
    // ::1 loopback
    if s == [0, 0, 0, 0, 0, 0, 0, 1] {
        return IpRange::Loopback;
    }
    // ::ffff:0:0/96 IPv4-mapped
    if s[..5] == [0, 0, 0, 0, 0] && s[5] == 0xffff {
        return IpRange::Ipv4Mapped;
    }
    // ff00::/8 multicast
    if s[0] & 0xff00 == 0xff00 {
        return IpRange::Multicast;
    }
    // fe80::/10 link-local
    if (s[0] & 0xffc0) == 0xfe80 {
        return IpRange::LinkLocal;
    }
    // fc00::/7 unique-local
    if (s[0] & 0xfe00) == 0xfc00 {
        return IpRange::UniqueLocal;
    }
    // 64:ff9b::/96 NAT64 translation
    if s[0] == 0x64 && s[1] == 0xff9b && s[2..6] == [0, 0, 0, 0] {
        return IpRange::Reserved;
    }
    // 100::/64 discard-only
    if s[0] == 0x100 && s[1..4] == [0, 0, 0] {
        return IpRange::Reserved;
    }
    // 2001:db8::/32 documentation
    if s[0] == 0x2001 && s[1] == 0xdb8 {
        return IpRange::Reserved;
    }
    // 2001::/32 Teredo
    if s[0] == 0x2001 && s[1] == 0 {
        return IpRange::Reserved;
    }
    // 2002::/16 6to4
    if s[0] == 0x2002 {
        return IpRange::Reserved;
    }
    IpRange::Unicast
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_ipv4() {
        assert!(is_public_unicast(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8))));
        assert!(is_public_unicast(IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1))));
        assert!(is_public_unicast(IpAddr::V4(Ipv4Addr::new(
            93, 184, 216, 34
        ))));
    }

    #[test]
    fn test_private_ipv4() {
        assert_eq!(classify_v4(Ipv4Addr::new(10, 0, 0, 1)), IpRange::Private);
        assert_eq!(classify_v4(Ipv4Addr::new(172, 16, 0, 1)), IpRange::Private);
        assert_eq!(
            classify_v4(Ipv4Addr::new(172, 31, 255, 255)),
            IpRange::Private
        );
        assert_eq!(classify_v4(Ipv4Addr::new(192, 168, 0, 1)), IpRange::Private);
        // Boundary neighbors stay unicast
        assert_eq!(classify_v4(Ipv4Addr::new(172, 15, 0, 1)), IpRange::Unicast);
        assert_eq!(classify_v4(Ipv4Addr::new(172, 32, 0, 1)), IpRange::Unicast);
        assert_eq!(classify_v4(Ipv4Addr::new(192, 167, 0, 1)), IpRange::Unicast);
    }

    #[test]
    fn test_special_ipv4_ranges() {
        assert_eq!(classify_v4(Ipv4Addr::new(127, 0, 0, 1)), IpRange::Loopback);
        assert_eq!(
            classify_v4(Ipv4Addr::new(169, 254, 1, 1)),
            IpRange::LinkLocal
        );
        assert_eq!(classify_v4(Ipv4Addr::new(0, 0, 0, 0)), IpRange::Unspecified);
        assert_eq!(classify_v4(Ipv4Addr::new(224, 0, 0, 1)), IpRange::Multicast);
        assert_eq!(
            classify_v4(Ipv4Addr::new(100, 64, 0, 1)),
            IpRange::CarrierGradeNat
        );
        assert_eq!(
            classify_v4(Ipv4Addr::new(100, 127, 255, 255)),
            IpRange::CarrierGradeNat
        );
        assert_eq!(classify_v4(Ipv4Addr::new(100, 63, 0, 1)), IpRange::Unicast);
        assert_eq!(
            classify_v4(Ipv4Addr::new(255, 255, 255, 255)),
            IpRange::Broadcast
        );
        assert_eq!(classify_v4(Ipv4Addr::new(240, 0, 0, 1)), IpRange::Reserved);
        assert_eq!(classify_v4(Ipv4Addr::new(192, 0, 2, 1)), IpRange::Reserved);
        assert_eq!(
            classify_v4(Ipv4Addr::new(198, 51, 100, 1)),
            IpRange::Reserved
        );
        assert_eq!(
            classify_v4(Ipv4Addr::new(203, 0, 113, 1)),
            IpRange::Reserved
        );
        assert_eq!(classify_v4(Ipv4Addr::new(198, 18, 0, 1)), IpRange::Reserved);
    }

    #[test]
    fn test_public_ipv6() {
        assert!(is_public_unicast(IpAddr::V6(Ipv6Addr::new(
            0x2607, 0xf8b0, 0x4004, 0x800, 0, 0, 0, 0x200e
        ))));
        assert!(is_public_unicast(IpAddr::V6(Ipv6Addr::new(
            0x2606, 0x4700, 0, 0, 0, 0, 0, 0x1111
        ))));
    }

    #[test]
    fn test_special_ipv6_ranges() {
        assert_eq!(
            classify_v6(Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 1)),
            IpRange::Loopback
        );
        assert_eq!(
            classify_v6(Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 0)),
            IpRange::Unspecified
        );
        assert_eq!(
            classify_v6(Ipv6Addr::new(0xfc00, 0, 0, 0, 0, 0, 0, 1)),
            IpRange::UniqueLocal
        );
        assert_eq!(
            classify_v6(Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 1)),
            IpRange::LinkLocal
        );
        assert_eq!(
            classify_v6(Ipv6Addr::new(0xff02, 0, 0, 0, 0, 0, 0, 1)),
            IpRange::Multicast
        );
        assert_eq!(
            classify_v6(Ipv6Addr::new(0, 0, 0, 0, 0, 0xffff, 0x7f00, 1)),
            IpRange::Ipv4Mapped
        );
        assert_eq!(
            classify_v6(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1)),
            IpRange::Reserved
        );
    }
}
