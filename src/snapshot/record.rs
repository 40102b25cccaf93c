//! Client statistic record and the column layout of the snapshot table.

use std::fmt;

/// Numeric columns of an iwinfo snapshot line.
///
/// The variant order is the column order: [`Field::ALL`] is the only place
/// that knows where each value sits on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Received signal strength (dBm).
    Rssi,
    /// Signal to noise ratio (dB).
    Snr,
    /// Seconds since the client last sent or received traffic.
    Inactive,
    /// Receive PHY rate.
    RxPhy,
    /// Received megabytes.
    RxMbytes,
    /// Receive packet retry rate.
    RxPrr,
    /// Receive VHT MCS index.
    RxVhtMcsIndex,
    /// Receive VHT channel width (MHz).
    RxVhtMcsMhz,
    /// Receive VHT spatial streams.
    RxVhtNss,
    /// Received packets.
    RxPackets,
    /// Transmit PHY rate.
    TxPhy,
    /// Transmitted megabytes.
    TxMbytes,
    /// Transmit packet retry rate.
    TxPrr,
    /// Transmit VHT MCS index.
    TxVhtMcsIndex,
    /// Transmit VHT channel width (MHz).
    TxVhtMcsMhz,
    /// Transmit VHT spatial streams.
    TxVhtNss,
    /// Transmitted packets.
    TxPackets,
    /// Expected throughput estimate.
    ExpectedThroughput,
    /// Channel utilization (percent).
    ChannelUtilization,
}

impl Field {
    /// Number of numeric columns.
    pub const COUNT: usize = 19;

    /// Token column of the first numeric field; 0 and 1 hold the identity.
    pub const FIRST_COLUMN: usize = 2;

    /// All numeric fields in column order.
    pub const ALL: [Field; Field::COUNT] = [
        Field::Rssi,
        Field::Snr,
        Field::Inactive,
        Field::RxPhy,
        Field::RxMbytes,
        Field::RxPrr,
        Field::RxVhtMcsIndex,
        Field::RxVhtMcsMhz,
        Field::RxVhtNss,
        Field::RxPackets,
        Field::TxPhy,
        Field::TxMbytes,
        Field::TxPrr,
        Field::TxVhtMcsIndex,
        Field::TxVhtMcsMhz,
        Field::TxVhtNss,
        Field::TxPackets,
        Field::ExpectedThroughput,
        Field::ChannelUtilization,
    ];

    /// Position of this field among the numeric fields.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Token column holding this field on a snapshot line.
    #[inline]
    pub fn column(self) -> usize {
        Self::FIRST_COLUMN + self.index()
    }

    /// Column name as printed in the snapshot header.
    pub fn name(self) -> &'static str {
        match self {
            Field::Rssi => "rssi",
            Field::Snr => "snr",
            Field::Inactive => "inactive",
            Field::RxPhy => "rx_phy",
            Field::RxMbytes => "rx_mbytes",
            Field::RxPrr => "rx_prr",
            Field::RxVhtMcsIndex => "rx_vht_mcs_index",
            Field::RxVhtMcsMhz => "rx_vht_mcs_mhz",
            Field::RxVhtNss => "rx_vht_nss",
            Field::RxPackets => "rx_packets",
            Field::TxPhy => "tx_phy",
            Field::TxMbytes => "tx_mbytes",
            Field::TxPrr => "tx_prr",
            Field::TxVhtMcsIndex => "tx_vht_mcs_index",
            Field::TxVhtMcsMhz => "tx_vht_mcs_mhz",
            Field::TxVhtNss => "tx_vht_nss",
            Field::TxPackets => "tx_packets",
            Field::ExpectedThroughput => "expected_throughput",
            Field::ChannelUtilization => "channel_utilization",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Statistics of one associated client at the time of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientStat {
    /// Radio interface reporting the client.
    pub interface: String,
    /// Client identifier, usually its MAC address.
    pub client: String,

    /// See [`Field::Rssi`].
    pub rssi: i64,
    /// See [`Field::Snr`].
    pub snr: i64,
    /// See [`Field::Inactive`].
    pub inactive_seconds: i64,

    /// See [`Field::RxPhy`].
    pub rx_phy: i64,
    /// See [`Field::RxMbytes`].
    pub rx_mbytes: i64,
    /// See [`Field::RxPrr`].
    pub rx_prr: i64,
    /// See [`Field::RxVhtMcsIndex`].
    pub rx_vht_mcs_index: i64,
    /// See [`Field::RxVhtMcsMhz`].
    pub rx_vht_mcs_mhz: i64,
    /// See [`Field::RxVhtNss`].
    pub rx_vht_nss: i64,
    /// See [`Field::RxPackets`].
    pub rx_packets: i64,

    /// See [`Field::TxPhy`].
    pub tx_phy: i64,
    /// See [`Field::TxMbytes`].
    pub tx_mbytes: i64,
    /// See [`Field::TxPrr`].
    pub tx_prr: i64,
    /// See [`Field::TxVhtMcsIndex`].
    pub tx_vht_mcs_index: i64,
    /// See [`Field::TxVhtMcsMhz`].
    pub tx_vht_mcs_mhz: i64,
    /// See [`Field::TxVhtNss`].
    pub tx_vht_nss: i64,
    /// See [`Field::TxPackets`].
    pub tx_packets: i64,

    /// See [`Field::ExpectedThroughput`].
    pub expected_throughput: i64,
    /// See [`Field::ChannelUtilization`].
    pub channel_utilization: i64,
}

impl ClientStat {
    /// Builds a record from its identity and the numeric columns in
    /// [`Field::ALL`] order.
    pub fn from_columns(
        interface: impl Into<String>,
        client: impl Into<String>,
        values: [i64; Field::COUNT],
    ) -> Self {
        let [rssi, snr, inactive_seconds, rx_phy, rx_mbytes, rx_prr, rx_vht_mcs_index, rx_vht_mcs_mhz, rx_vht_nss, rx_packets, tx_phy, tx_mbytes, tx_prr, tx_vht_mcs_index, tx_vht_mcs_mhz, tx_vht_nss, tx_packets, expected_throughput, channel_utilization] =
            values;

        Self {
            interface: interface.into(),
            client: client.into(),
            rssi,
            snr,
            inactive_seconds,
            rx_phy,
            rx_mbytes,
            rx_prr,
            rx_vht_mcs_index,
            rx_vht_mcs_mhz,
            rx_vht_nss,
            rx_packets,
            tx_phy,
            tx_mbytes,
            tx_prr,
            tx_vht_mcs_index,
            tx_vht_mcs_mhz,
            tx_vht_nss,
            tx_packets,
            expected_throughput,
            channel_utilization,
        }
    }

    /// Returns the value of a numeric field.
    pub fn get(&self, field: Field) -> i64 {
        match field {
            Field::Rssi => self.rssi,
            Field::Snr => self.snr,
            Field::Inactive => self.inactive_seconds,
            Field::RxPhy => self.rx_phy,
            Field::RxMbytes => self.rx_mbytes,
            Field::RxPrr => self.rx_prr,
            Field::RxVhtMcsIndex => self.rx_vht_mcs_index,
            Field::RxVhtMcsMhz => self.rx_vht_mcs_mhz,
            Field::RxVhtNss => self.rx_vht_nss,
            Field::RxPackets => self.rx_packets,
            Field::TxPhy => self.tx_phy,
            Field::TxMbytes => self.tx_mbytes,
            Field::TxPrr => self.tx_prr,
            Field::TxVhtMcsIndex => self.tx_vht_mcs_index,
            Field::TxVhtMcsMhz => self.tx_vht_mcs_mhz,
            Field::TxVhtNss => self.tx_vht_nss,
            Field::TxPackets => self.tx_packets,
            Field::ExpectedThroughput => self.expected_throughput,
            Field::ChannelUtilization => self.channel_utilization,
        }
    }
}
