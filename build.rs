use chrono::Utc;

fn main() {
    // 版本号 + 构建时间，供 `--version` 显示
    let version = std::env::var("CARGO_PKG_VERSION").unwrap_or_default();
    let build_time = Utc::now().format("%Y-%m-%d %H:%M UTC").to_string();
    println!("cargo:rustc-env=LONG_VERSION={} (built {})", version, build_time);

    println!("cargo:rerun-if-changed=build.rs");
}
