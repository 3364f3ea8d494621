//! Tests for toolchain resolution as seen through build parts.

use cdb_conformance::{database, gcc_and_clang, pipeline, pipeline_with, record};
use cdb_diagnostics::DiagnosticCode;
use cdb_toolchain::{
    HostOs, Language, StaticRegistry, Toolchain, ToolchainFamily, ToolchainId, DRIVER_MODE_FLAG,
};

fn cxx_toolchain_of(text: &str, registry: &StaticRegistry) -> Option<String> {
    let result = pipeline_with(text, registry, HostOs::Unix);
    result.build.parts[0]
        .cxx_flags
        .as_ref()
        .and_then(|flags| flags.toolchain.as_ref())
        .map(|id| id.as_str().to_string())
}

fn gpp_record() -> String {
    database(&[record(
        "/proj",
        "/proj/a.cpp",
        &["/opt/cross/bin/arm-none-eabi-g++", "-std=c++17"],
    )])
}

#[test]
fn gcc_family_is_preferred() {
    assert_eq!(
        cxx_toolchain_of(&gpp_record(), &gcc_and_clang()).as_deref(),
        Some("gcc-cxx")
    );
}

#[test]
fn clang_when_no_gcc_is_registered() {
    let registry = StaticRegistry::new(vec![Toolchain::new(
        "clang-cxx",
        ToolchainFamily::Clang,
        Language::Cxx,
        "/usr/bin/clang++",
    )]);
    assert_eq!(
        cxx_toolchain_of(&gpp_record(), &registry).as_deref(),
        Some("clang-cxx")
    );
}

#[test]
fn environment_default_as_last_resort() {
    let registry = StaticRegistry::new(vec![Toolchain::new(
        "msvc-cxx",
        ToolchainFamily::Msvc,
        Language::Cxx,
        "C:/VS/bin/cl.exe",
    )])
    .with_default(Language::Cxx, ToolchainId::new("msvc-cxx"));
    let result = pipeline_with(&gpp_record(), &registry, HostOs::Unix);
    let flags = result.build.parts[0].cxx_flags.as_ref().unwrap();
    assert_eq!(flags.toolchain.as_ref().map(|id| id.as_str()), Some("msvc-cxx"));
    assert_eq!(result.count(DiagnosticCode::TOOLCHAIN_DEFAULTED), 1);
    assert_eq!(result.warning_count, 1);
}

#[test]
fn no_toolchain_still_produces_the_part() {
    let result = pipeline_with(&gpp_record(), &StaticRegistry::default(), HostOs::Unix);
    assert_eq!(result.build.parts.len(), 1);
    let flags = result.build.parts[0].cxx_flags.as_ref().unwrap();
    assert!(flags.toolchain.is_none());
    assert_eq!(result.count(DiagnosticCode::TOOLCHAIN_MISSING), 1);
}

#[test]
fn exact_compiler_match_wins() {
    let text = database(&[
        record("/proj", "/proj/a.c", &["/usr/bin/clang", "-c", "a.c"]),
        record("/proj", "/proj/b.cpp", &["/usr/bin/clang++", "-c", "b.cpp"]),
    ]);
    let result = pipeline(&text);
    assert_eq!(result.build.c_toolchain.as_ref().map(|id| id.as_str()), Some("clang-c"));
    assert_eq!(
        result.build.cxx_toolchain.as_ref().map(|id| id.as_str()),
        Some("clang-cxx")
    );
}

#[test]
fn resolution_is_deterministic() {
    let text = database(&[
        record("/proj", "/proj/a.cpp", &["/opt/bin/g++-12", "-O2"]),
        record("/proj", "/proj/b.c", &["/opt/bin/gcc-12", "-O2"]),
    ]);
    let first = pipeline(&text);
    let second = pipeline(&text);
    assert_eq!(first.build, second.build);
}

#[test]
fn clang_cl_gets_gcc_driver_mode_for_gcc_style_invocations() {
    let registry = StaticRegistry::new(vec![Toolchain::new(
        "clang-cl",
        ToolchainFamily::ClangCl,
        Language::Cxx,
        "C:/LLVM/bin/clang-cl.exe",
    )]);
    let text = database(&[record(
        "C:/proj",
        "C:/proj/a.cpp",
        &["C:/mingw/bin/g++.exe", "-std=c++17"],
    )]);
    let result = pipeline_with(&text, &registry, HostOs::Windows);
    let flags = result.build.parts[0].cxx_flags.as_ref().unwrap();
    assert_eq!(flags.toolchain.as_ref().map(|id| id.as_str()), Some("clang-cl"));
    assert_eq!(flags.flags.first().map(String::as_str), Some(DRIVER_MODE_FLAG));
}

#[test]
fn toolchain_is_resolved_once_per_language() {
    let text = database(&[
        record("/proj", "/proj/a.cpp", &["/opt/x/xcc", "-DA"]),
        record("/proj", "/proj/b.cpp", &["/opt/x/xcc", "-DB"]),
        record("/proj", "/proj/c.cpp", &["/opt/x/xcc", "-DC"]),
    ]);
    let registry = StaticRegistry::new(vec![Toolchain::new(
        "msvc-cxx",
        ToolchainFamily::Msvc,
        Language::Cxx,
        "C:/VS/bin/cl.exe",
    )])
    .with_default(Language::Cxx, ToolchainId::new("msvc-cxx"));
    let result = pipeline_with(&text, &registry, HostOs::Unix);
    assert_eq!(result.build.parts.len(), 3);
    assert_eq!(result.count(DiagnosticCode::TOOLCHAIN_DEFAULTED), 1);
}

#[test]
fn a_miss_does_not_stick_to_later_parts() {
    let registry = StaticRegistry::new(vec![Toolchain::new(
        "gcc-cxx",
        ToolchainFamily::Gcc,
        Language::Cxx,
        "/usr/bin/g++",
    )]);
    let text = database(&[
        record("/proj", "/proj/a.cpp", &["/opt/x/xcc", "-DA"]),
        record("/proj", "/proj/b.cpp", &["/usr/bin/g++", "-DB"]),
    ]);
    let result = pipeline_with(&text, &registry, HostOs::Unix);
    let toolchains: Vec<Option<&str>> = result
        .build
        .parts
        .iter()
        .map(|p| {
            p.cxx_flags
                .as_ref()
                .and_then(|f| f.toolchain.as_ref())
                .map(|id| id.as_str())
        })
        .collect();
    assert_eq!(toolchains, vec![None, Some("gcc-cxx")]);
    assert_eq!(result.count(DiagnosticCode::TOOLCHAIN_MISSING), 1);
}
