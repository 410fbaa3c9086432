fn main() {
    println!("cargo:rerun-if-env-changed=TILTMORSE_CONFIG_JSON");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
