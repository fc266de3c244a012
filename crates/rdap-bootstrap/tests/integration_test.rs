//! Integration tests for the cache -> parse -> lookup cycle.
//!
//! Two `DiskCache` instances sharing one directory stand in for two
//! processes sharing a cache directory.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tempfile::TempDir;

use rdap_bootstrap::{
    BootstrapError, CacheConfig, DiskCache, DnsRegistry, FileState, MemoryCache, Registry,
    RegistryCache, RegistryType,
};

/// Helper to read a fixture from the crate's testdata directory
fn fixture(name: &str) -> Vec<u8> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata").join(name);
    std::fs::read(path).expect("fixture should exist")
}

/// Lets the file system clock move past the previous write.
fn tick() {
    thread::sleep(Duration::from_millis(50));
}

// =============================================================================
// Lookup scenarios
// =============================================================================

#[test]
fn test_concrete_scenario() {
    let json = br#"{"services":[[["com"],["https://example.com","http://example.com"]]]}"#;
    let registry = DnsRegistry::new(json, &HashMap::new()).unwrap();

    let answer = registry.lookup("example.com");

    assert_eq!(answer.entry, "com");
    let urls: Vec<&str> = answer.urls.iter().map(url::Url::as_str).collect();
    assert_eq!(urls, vec!["https://example.com/", "http://example.com/"]);
}

#[test]
fn test_zero_entry_documents_fail_for_every_registry() {
    let overrides = HashMap::new();
    for registry in RegistryType::ALL {
        let err = registry
            .build(br#"{"description":"empty","services":[]}"#, &overrides)
            .unwrap_err();
        assert!(matches!(err, BootstrapError::NoEntries), "{registry}: {err}");
    }
}

#[test]
fn test_concurrent_lookups_share_registry() {
    let registry = Arc::new(DnsRegistry::new(&fixture("dns_complex.json"), &HashMap::new()).unwrap());

    let handles: Vec<_> = ["a.sub.example.com", "example.com", "example.xyz", "sub.example.com"]
        .into_iter()
        .map(|query| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || registry.lookup(query).entry)
        })
        .collect();

    let entries: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(entries, vec!["sub.example.com", "com", "", "sub.example.com"]);
}

// =============================================================================
// Cache-driven rebuilds
// =============================================================================

#[test]
fn test_memory_cache_drives_rebuild() {
    let cache = MemoryCache::new();
    let filename = RegistryType::Dns.filename();
    assert_eq!(cache.state(filename), FileState::Absent);

    cache.save(filename, &fixture("dns.json")).unwrap();
    assert_eq!(cache.state(filename), FileState::Good);

    let registry = RegistryType::Dns
        .build(&cache.load(filename).unwrap(), &HashMap::new())
        .unwrap();
    assert_eq!(registry.lookup("nic.cz").entry, "cz");
    assert_eq!(registry.file().json, fixture("dns.json"));
}

#[test]
fn test_disk_cache_detects_write_by_another_instance() {
    let dir = TempDir::new().unwrap();
    let writer = DiskCache::new(CacheConfig::new(dir.path()));
    let reader = DiskCache::new(CacheConfig::new(dir.path()));
    let filename = RegistryType::Dns.filename();

    assert_eq!(reader.state(filename), FileState::Absent);

    writer.save(filename, &fixture("dns.json")).unwrap();
    assert_eq!(writer.state(filename), FileState::Good);
    // Never loaded by the reader.
    assert_eq!(reader.state(filename), FileState::ShouldReload);

    let first = DnsRegistry::new(&reader.load(filename).unwrap(), &HashMap::new()).unwrap();
    assert_eq!(reader.state(filename), FileState::Good);
    assert!(first.lookup("example.com").is_empty());

    tick();
    writer.save(filename, &fixture("dns_complex.json")).unwrap();

    assert_eq!(reader.state(filename), FileState::ShouldReload);
    let second = DnsRegistry::new(&reader.load(filename).unwrap(), &HashMap::new()).unwrap();
    assert_eq!(reader.state(filename), FileState::Good);
    assert_eq!(second.lookup("example.com").entry, "com");
}

#[test]
fn test_disk_cache_failed_parse_keeps_previous_bytes() {
    let dir = TempDir::new().unwrap();
    let cache = DiskCache::new(CacheConfig::new(dir.path()));
    let filename = RegistryType::Ipv4.filename();

    cache.save(filename, &fixture("ipv4.json")).unwrap();

    // A caller only saves documents that parse.
    let fetched = fixture("dns_syntax_error.json");
    if RegistryType::Ipv4.build(&fetched, &HashMap::new()).is_ok() {
        cache.save(filename, &fetched).unwrap();
    }

    let registry = RegistryType::Ipv4
        .build(&cache.load(filename).unwrap(), &HashMap::new())
        .unwrap();
    assert_eq!(registry.lookup("10.1.1.1").entry, "10.1.0.0/16");
}

#[test]
fn test_disk_cache_expiry_is_per_instance_timeout() {
    let dir = TempDir::new().unwrap();
    let patient = DiskCache::new(CacheConfig::new(dir.path()));
    let impatient =
        DiskCache::new(CacheConfig::new(dir.path()).with_timeout(Duration::from_millis(1)));
    let filename = RegistryType::Asn.filename();

    patient.save(filename, &fixture("asn.json")).unwrap();
    impatient.load(filename).unwrap();
    tick();

    assert_eq!(patient.state(filename), FileState::Good);
    assert_eq!(impatient.state(filename), FileState::Expired);
}

#[test]
fn test_disk_cache_concurrent_writers_and_readers() {
    const WRITERS: u8 = 4;
    const PAYLOAD_LEN: usize = 256 * 1024;

    let dir = TempDir::new().unwrap();
    let filename = RegistryType::Dns.filename();
    let payload = |id: u8| vec![id; PAYLOAD_LEN];

    DiskCache::new(CacheConfig::new(dir.path()))
        .save(filename, &payload(0))
        .unwrap();

    let writers: Vec<_> = (1..=WRITERS)
        .map(|id| {
            let cache = DiskCache::new(CacheConfig::new(dir.path()));
            thread::spawn(move || {
                for _ in 0..20 {
                    cache.save(filename, &payload(id)).unwrap();
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let cache = DiskCache::new(CacheConfig::new(dir.path()));
            thread::spawn(move || {
                for _ in 0..50 {
                    assert_ne!(cache.state(filename), FileState::Absent);
                    let data = cache.load(filename).unwrap();
                    assert_eq!(data.len(), PAYLOAD_LEN, "partial file observed");
                    assert!(data.iter().all(|&b| b == data[0]), "mixed payloads observed");
                    assert!(data[0] <= WRITERS);
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().unwrap();
    }

    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from(filename)]);
}
