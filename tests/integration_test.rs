use vmprobe::scenario::{Pause, ScenarioConfig, ScenarioError, run_scenario};
use vmprobe_core::platform::{MemoryProvider, NativeProvider};
use vmprobe_core::util::Size;

// Resident-set assertions are process-wide, so the lazy and force-commit
// scenarios run inside a single test to keep other tests' allocations out
// of the deltas.
#[test]
fn test_paging_scenarios_end_to_end() -> anyhow::Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let provider = NativeProvider;
    let noise = Size::MB(32).bytes() as u64;

    // Lazy: reserving without touching must not grow the resident set.
    let mut config = ScenarioConfig::lazy(Size::MB(512));
    config.pause = Pause::None;
    let report = run_scenario(&provider, &config, None)?;
    assert_eq!(report.pages_touched, None);
    assert_eq!(report.size_bytes, Size::MB(512).bytes());
    let before = report.sample("before allocation").expect("sample").bytes;
    let reserved = report
        .sample("after allocation (before touch)")
        .expect("sample")
        .bytes;
    assert!(
        reserved.saturating_sub(before) < noise,
        "lazy reservation grew the resident set: {} -> {}",
        before,
        reserved
    );

    // Force commit: one byte per page must commit roughly the whole region.
    let mut config = ScenarioConfig::force_commit(Size::MB(256));
    config.pause = Pause::None;
    let report = run_scenario(&provider, &config, None)?;
    assert_eq!(
        report.pages_touched,
        Some(Size::MB(256).bytes() / provider.page_size())
    );
    let before = report.sample("before allocation").expect("sample").bytes;
    let touched = report.sample("after touching pages").expect("sample").bytes;
    let freed = report.sample("after free").expect("sample").bytes;
    assert!(
        touched.saturating_sub(before) >= Size::MB(192).bytes() as u64,
        "force commit raised the resident set by only {} -> {}",
        before,
        touched
    );
    assert!(
        freed < before + noise,
        "release did not return the pages: {} -> {}",
        before,
        freed
    );
    Ok(())
}

#[test]
fn test_reservation_failure_aborts_scenario() {
    // 1 EiB cannot be reserved on any supported platform.
    let mut config = ScenarioConfig::lazy(Size::GB(1 << 30));
    config.pause = Pause::None;
    let result = run_scenario(&NativeProvider, &config, None);
    assert!(matches!(result, Err(ScenarioError::Reserve(_))));
}

#[test]
fn test_pretouch_sample_is_configurable() -> anyhow::Result<()> {
    let mut config = ScenarioConfig::force_commit(Size::MB(4));
    config.pause = Pause::None;
    config.sample_before_touch = false;
    let report = run_scenario(&NativeProvider, &config, None)?;
    assert!(report.sample("after allocation (before touch)").is_none());
    assert!(report.sample("after touching pages").is_some());
    assert!(report.sample("after free").is_some());
    Ok(())
}
