// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

// Runs in its own binary: the switch is read once per process.

use spanrw_core::error::{panic_on_error, PANIC_ON_ERROR_ENV};
use spanrw_core::Reader;

#[test]
#[should_panic(expected = "SPANRW_PANIC_ON_ERROR")]
fn test_errors_panic_at_call_site() {
    std::env::set_var(PANIC_ON_ERROR_ENV, "1");
    assert!(panic_on_error());
    let _ = Reader::new(&[]).read_u8();
}
