// SPDX-FileCopyrightText: 2026 notisync contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    notisync_cli::run().await
}
