// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  merchant.rs - Payment request demo for EMV QR payment payloads.
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

use std::fs::File;
use std::io::BufReader;

use clap::Parser;

use emvqr::decoder::*;
use emvqr::interpreter::*;
use emvqr::profile::*;
use emvqr::render::to_text;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The payload text read from the QR code.
    payload: String,

    /// A CSV file of tag names to use instead of the built-in table.
    #[arg(long)]
    profile: Option<String>,
}

fn main() {
    env_logger::init();

    let args = Args::parse();

    let profile = match &args.profile {
        Some(filename) => {
            let file = match File::open(filename) {
                Ok(f) => f,
                Err(error) => {
                    eprintln!("Error opening profile {:?}: {}", filename, error);
                    return;
                }
            };
            match Profile::from_csv(BufReader::new(file)) {
                Ok(p) => p,
                Err(error) => {
                    eprintln!("Error loading profile {:?}: {}", filename, error);
                    return;
                }
            }
        }
        None => Profile::emv_mpm(),
    };

    let document = match decode_with(&args.payload, &profile) {
        Ok(d) => d,
        Err(error) => {
            eprintln!("Error decoding payload {:?}: {}", &args.payload, error);
            return;
        }
    };

    let payload = match MerchantPayload::from_document(&document) {
        Ok(p) => p,
        Err(error) => {
            eprintln!("Error interpreting payload {:?}: {}", &args.payload, error);
            return;
        }
    };

    let show = |label: &str, value: &Option<String>| {
        if let Some(v) = value {
            println!("{:<12} {}", label, v);
        }
    };

    show("Merchant:", &payload.merchant_name);
    show("City:", &payload.merchant_city);
    show("Postal code:", &payload.postal_code);
    show("Country:", &payload.country_code);
    show("MCC:", &payload.merchant_category_code);
    show("Currency:", &payload.transaction_currency);
    if let Some(amount) = payload.transaction_amount {
        println!("{:<12} {}", "Amount:", amount);
    }
    match payload.point_of_initiation {
        Some(PointOfInitiation::Static) => println!("{:<12} static", "Code:"),
        Some(PointOfInitiation::Dynamic) => println!("{:<12} dynamic", "Code:"),
        None => (),
    }

    for account in &payload.merchant_accounts {
        match account.fields() {
            Some(fields) => {
                println!("Account (tag {}):", account.tag);
                for line in to_text(fields).lines() {
                    println!("  {}", line);
                }
            }
            None => {
                if let Value::Text(id) = &account.value {
                    println!("Account (tag {}): {}", account.tag, id);
                }
            }
        }
    }

    show("CRC:", &payload.crc);
}
