fn main() -> std::process::ExitCode {
    mileage_tracker_lib::run()
}
