//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter         | Implements     | Connects to              |
//! |-----------------|----------------|--------------------------|
//! | `SensorAdapter` | `SensorPort`   | ESP32 ADC1 + sense relay |
//! | `RelayBank`     | `ActuatorPort` | pilot/fire/fan relays    |
//! | `LogEventSink`  | `EventSink`    | Serial log output        |

pub mod hardware;
pub mod log_sink;
