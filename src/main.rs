// Copyright 2025 JiangLong.
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

use clap::Parser;
use template_repository::cli::{init_tracing, CliArgs, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // The server installs tracing itself once its log level is resolved
    if !args.command.is_server() {
        init_tracing("warn");
    }

    match args.command {
        Commands::Serve(cmd) => cmd.execute().await,
        Commands::List(cmd) => cmd.execute().await,
        Commands::Get(cmd) => cmd.execute().await,
        Commands::Render(cmd) => cmd.execute().await,
        Commands::Create(cmd) => cmd.execute().await,
        Commands::Delete(cmd) => cmd.execute().await,
        Commands::Health(cmd) => cmd.execute().await,
    }
}
