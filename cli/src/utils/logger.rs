/// Route `log` output through pretty_env_logger. `RUST_LOG` wins when set;
/// otherwise `--verbose` also shows why individual rules were rejected.
pub fn init_logger(verbose: bool) {
    if std::env::var("RUST_LOG").is_err() {
        if verbose {
            std::env::set_var("RUST_LOG", "dportal=debug,dp_filter=debug");
        } else {
            std::env::set_var("RUST_LOG", "dportal=info,dp_filter=warn");
        }
    }
    pretty_env_logger::init();
}
