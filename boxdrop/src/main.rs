// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! boxdrop: click to drop boxes onto a platform, Escape to quit

use boxdrop::config::{EngineConfig, ScreenMode};
use boxdrop::engine::Engine;
use boxdrop::error::EngineError;
use boxdrop::logging::init_logging;
use boxdrop::platform::window::WindowPlatform;
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(err) = init_logging() {
        eprintln!("Logging unavailable: {}", err);
    }

    match play() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Game engine failed: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn play() -> Result<(), EngineError> {
    let config = EngineConfig::from_env()?;
    let mut engine = Engine::new(WindowPlatform::new(), config);
    engine.configure(ScreenMode::Windowed)?;

    println!("boxdrop");
    println!("=======\n");
    println!("  Left click : drop a box");
    println!("  Escape     : quit\n");

    let summary = engine.run()?;
    println!(
        "Rendered {} frames, released {} bodies",
        summary.frames, summary.bodies_released
    );
    Ok(())
}
