fn main() -> std::process::ExitCode {
    jellyplex_sync::start()
}
