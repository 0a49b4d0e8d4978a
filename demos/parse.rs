// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  parse.rs - Decoder demo for EMV QR payment payloads.
 *  Copyright (C) 2026  Forest Crossman <cyrozap@gmail.com>
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use clap::Parser;

use emvqr::decoder::*;
use emvqr::render::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The payload text read from the QR code.
    payload: String,

    /// Print JSON instead of an indented tree.
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::init();

    let args = Args::parse();

    let document = match decode(&args.payload) {
        Ok(d) => d,
        Err(error) => {
            eprintln!("Error decoding payload {:?}: {}", &args.payload, error);
            return;
        }
    };

    if args.json {
        match to_json(&document) {
            Ok(json) => println!("{}", json),
            Err(error) => eprintln!("Error serializing payload: {}", error),
        }
    } else {
        print!("{}", to_text(&document));
    }
}
