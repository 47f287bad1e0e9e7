fn main() {
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("windows") {
        let mut res = winres::WindowsResource::new();
        res.set("FileDescription", "TinyWiiBackupManager Installer");
        res.set("ProductName", "TinyWiiBackupManager");
        res.compile().expect("Unable to compile Windows resources");
    }
}
